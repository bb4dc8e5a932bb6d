//! Server-rendered pages.
//!
//! Templates are compiled into the binary and registered once at startup.

use chrono::{Local, NaiveDate};
use fleet_shared::dates::format_date;
use fleet_shared::models::{CarStatus, StatusSnapshot};
use minijinja::{context, Environment};
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index.html";
const EDIT_TEMPLATE: &str = "edit.html";

/// One table row on the status page.
#[derive(Debug, Serialize)]
struct CarRow<'a> {
    filename: &'a str,
    last_reserved: String,
    available_again: String,
    available: bool,
    error: Option<&'a str>,
}

impl<'a> CarRow<'a> {
    fn new(filename: &'a str, status: &'a CarStatus) -> Self {
        match status {
            CarStatus::Ready(record) => Self {
                filename,
                last_reserved: display_date(record.last_reserved),
                available_again: display_date(record.available_again),
                available: record.available,
                error: None,
            },
            CarStatus::Failed(failure) => Self {
                filename,
                last_reserved: String::new(),
                available_again: String::new(),
                available: false,
                error: Some(&failure.message),
            },
        }
    }
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

/// `<input type="date">` expects ISO dates.
fn input_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[derive(Debug)]
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        env.add_template(EDIT_TEMPLATE, include_str!("../templates/edit.html"))?;
        Ok(Self { env })
    }

    pub fn index(&self, snapshot: &StatusSnapshot) -> Result<String, minijinja::Error> {
        let cars: Vec<CarRow<'_>> = snapshot
            .cars
            .iter()
            .map(|(filename, status)| CarRow::new(filename, status))
            .collect();
        let refreshed_at = snapshot.refreshed_at.map(|at| {
            at.with_timezone(&Local)
                .format("%d.%m.%Y %H:%M:%S")
                .to_string()
        });

        self.env.get_template(INDEX_TEMPLATE)?.render(context! {
            cars => cars,
            refreshed_at => refreshed_at,
        })
    }

    pub fn edit(&self, filename: &str, status: Option<&CarStatus>) -> Result<String, minijinja::Error> {
        let record = status.and_then(CarStatus::record);
        let error = status
            .and_then(CarStatus::failure)
            .map(|failure| failure.message.as_str());

        self.env.get_template(EDIT_TEMPLATE)?.render(context! {
            filename => filename,
            last_reserved => input_date(record.and_then(|r| r.last_reserved)),
            available_again => input_date(record.and_then(|r| r.available_again)),
            error => error,
        })
    }
}
