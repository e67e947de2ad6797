use ansi_term::{Colour, Style};
use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::{
    aggregation::{summary::GlobalSummary, weekly::WeekData},
    session::entities::{ActiveSession, WorkSession},
    utils::{
        percentage::duration_percentage,
        time::{format_clock_duration, format_hours_minutes},
    },
};

const MOMENT_FORMAT: &str = "%a %d %b %Y %H:%M";
const WEEK_BOUND_FORMAT: &str = "%d %b";

fn heading(text: &str) -> String {
    Style::new().bold().paint(text).to_string()
}

fn local(moment: DateTime<Utc>) -> DateTime<Local> {
    moment.with_timezone(&Local)
}

pub fn print_status(active: Option<&ActiveSession>, now: DateTime<Utc>) {
    match active {
        Some(active) => println!(
            "Working since {}\t{}",
            local(active.start_time).format(MOMENT_FORMAT),
            format_clock_duration(active.elapsed_at(now))
        ),
        None => println!("Not clocked in"),
    }
}

pub fn print_session(session: &WorkSession) {
    println!(
        "{}\t{}\t{}\t{}",
        session.id,
        local(session.start_time).format(MOMENT_FORMAT),
        local(session.end_time).format(MOMENT_FORMAT),
        format_clock_duration(session.elapsed())
    );
}

pub fn print_sessions(sessions: &[WorkSession]) {
    if sessions.is_empty() {
        println!("No sessions to show.");
        return;
    }
    println!("{}", heading("id\tstart\tend\tduration"));
    for session in sessions {
        print_session(session);
    }
}

/// One line per week with the gross and the break adjusted totals.
pub fn print_weeks(weeks: &[WeekData<Local>]) {
    if weeks.is_empty() {
        println!("No sessions to show.");
        return;
    }
    println!("{}", heading("week\tgross\treal\tsessions"));
    for week in weeks {
        println!(
            "{} - {}\t{}\t{}\t{}",
            week.start_date.format(WEEK_BOUND_FORMAT),
            week.end_date.format(WEEK_BOUND_FORMAT),
            format_hours_minutes(week.total_duration),
            format_hours_minutes(week.total_duration_with_breaks),
            week.sessions.len()
        );
    }
}

fn print_dates(dates: &[NaiveDate], colour: Colour) {
    let rendered = dates
        .iter()
        .map(|date| date.format("%A %-d %B").to_string())
        .collect::<Vec<_>>();
    println!("\t{}", colour.paint(rendered.join(", ")));
}

pub fn print_summary(summary: &GlobalSummary) {
    let total = summary.total_duration;
    println!("{}", heading("Summary"));
    println!("Gross\t{}", format_hours_minutes(total));
    println!(
        "Real\t{}\t(-30m for each of {} days)",
        format_hours_minutes(summary.total_duration_with_breaks),
        summary.worked_days
    );
    println!(
        "Night\t{}\t{}",
        format_hours_minutes(summary.night_duration),
        duration_percentage(summary.night_duration, total)
    );
    if !summary.nocturnal_dates.is_empty() {
        print_dates(&summary.nocturnal_dates, Colour::Blue);
    }
    println!(
        "Holiday\t{}\t{}",
        format_hours_minutes(summary.holiday_duration),
        duration_percentage(summary.holiday_duration, total)
    );
    if !summary.holiday_dates.is_empty() {
        print_dates(&summary.holiday_dates, Colour::Yellow);
    }
}
