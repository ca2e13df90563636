//! Expense display formatting
//!
//! Provides utilities for formatting expenses and summaries for terminal
//! display, using the currency symbol and date format from the settings.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::models::expense::DATE_FORMAT;
use crate::models::{CategoryReport, Expense, Money, MonthlySummary, Summary};

const NAME_WIDTH: usize = 24;
const CATEGORY_WIDTH: usize = 16;
const RULE_WIDTH: usize = 72;

/// Format a single expense as a list row, prefixed with its 1-based position
pub fn format_expense_row(position: usize, expense: &Expense, settings: &Settings) -> String {
    format!(
        "{:>4} {:>6} {:10} {:nw$} {:>12} {:cw$}",
        position,
        format!("#{}", expense.id()),
        format_date(expense.date(), settings),
        truncate(expense.name(), NAME_WIDTH),
        format_money(expense.amount(), settings),
        truncate(expense.category(), CATEGORY_WIDTH),
        nw = NAME_WIDTH,
        cw = CATEGORY_WIDTH,
    )
    .trim_end()
    .to_string()
}

/// Format a list of expenses in listing order
pub fn format_expense_list(expenses: &[Expense], settings: &Settings) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:>4} {:>6} {:10} {:nw$} {:>12} {}\n",
        "#",
        "ID",
        "Date",
        "Description",
        "Amount",
        "Category",
        nw = NAME_WIDTH,
    ));
    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');

    for (i, expense) in expenses.iter().enumerate() {
        output.push_str(&format_expense_row(i + 1, expense, settings));
        output.push('\n');
    }

    output.push_str(&"-".repeat(RULE_WIDTH));
    output.push('\n');
    match Summary::of(expenses) {
        Ok(summary) => output.push_str(&format!(
            "{} expense(s), total {}\n",
            summary.count,
            format_money(summary.total, settings)
        )),
        Err(e) => output.push_str(&format!("{} expense(s), {}\n", expenses.len(), e)),
    }

    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, settings: &Settings) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense ID:  {}\n", expense.id()));
    output.push_str(&format!("Description: {}\n", expense.name()));
    output.push_str(&format!(
        "Amount:      {}\n",
        format_money(expense.amount(), settings)
    ));
    output.push_str(&format!(
        "Date:        {}\n",
        format_date(expense.date(), settings)
    ));
    output.push_str(&format!("Category:    {}\n", expense.category()));

    output
}

/// Format the overall summary; `None` means nothing is recorded
pub fn format_summary(summary: Option<&Summary>, settings: &Settings) -> String {
    match summary {
        None => "No expenses recorded.\n".to_string(),
        Some(summary) => format!(
            "Total expenses: {}\nTotal amount:   {}\n",
            summary.count,
            format_money(summary.total, settings)
        ),
    }
}

/// Format a summary for one calendar month
pub fn format_monthly_summary(monthly: &MonthlySummary, settings: &Settings) -> String {
    let label = month_label(monthly.year, monthly.month);

    if monthly.summary.is_empty() {
        return format!("No expenses recorded for {}.\n", label);
    }

    format!(
        "Summary for {}\nTotal expenses: {}\nTotal amount:   {}\n",
        label,
        monthly.summary.count,
        format_money(monthly.summary.total, settings)
    )
}

/// Format the expenses matching a category filter
pub fn format_category_report(report: &CategoryReport, settings: &Settings) -> String {
    if report.expenses.is_empty() {
        return format!("No expenses found in category '{}'.\n", report.category);
    }

    let mut output = String::new();
    output.push_str(&format!("Expenses in category '{}':\n", report.category));
    for expense in &report.expenses {
        output.push_str(&format!(
            "  #{:<5} {:10} {:nw$} {:>12}\n",
            expense.id(),
            format_date(expense.date(), settings),
            truncate(expense.name(), NAME_WIDTH),
            format_money(expense.amount(), settings),
            nw = NAME_WIDTH,
        ));
    }
    output.push_str(&format!(
        "{} expense(s), total {}\n",
        report.summary.count,
        format_money(report.summary.total, settings)
    ));

    output
}

/// Format an amount with the configured currency symbol
pub fn format_money(amount: Money, settings: &Settings) -> String {
    amount.format_with_symbol(&settings.currency_symbol)
}

/// Format a date with the configured display format
///
/// A format the date cannot render (unknown or time specifiers) falls back
/// to ISO 8601.
pub fn format_date(date: NaiveDate, settings: &Settings) -> String {
    let mut output = String::new();
    match write!(output, "{}", date.format(&settings.date_format)) {
        Ok(()) => output,
        Err(_) => date.format(DATE_FORMAT).to_string(),
    }
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", year, month))
}

/// Truncate a string to a maximum number of characters
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IdSequence;

    fn expense(ids: &mut IdSequence, name: &str, cents: i64, category: &str) -> Expense {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Expense::new(ids, name, Money::from_cents(cents), date, category).unwrap()
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(
            format_expense_list(&[], &Settings::default()),
            "No expenses recorded.\n"
        );
    }

    #[test]
    fn test_list_shows_positions_and_total() {
        let mut ids = IdSequence::new();
        let expenses = vec![
            expense(&mut ids, "Coffee", 350, "Food"),
            expense(&mut ids, "Bus", 200, "Transport"),
        ];

        let output = format_expense_list(&expenses, &Settings::default());
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[2].starts_with("   1     #1 2024-05-01 Coffee"));
        assert!(lines[2].contains("$3.50"));
        assert!(lines[3].starts_with("   2     #2"));
        assert!(output.ends_with("2 expense(s), total $5.50\n"));
    }

    #[test]
    fn test_currency_symbol_from_settings() {
        let mut ids = IdSequence::new();
        let coffee = expense(&mut ids, "Coffee", 350, "Food");
        let settings = Settings {
            currency_symbol: "€".to_string(),
            date_format: "%d/%m/%Y".to_string(),
            ..Settings::default()
        };

        let details = format_expense_details(&coffee, &settings);
        assert!(details.contains("Amount:      €3.50"));
        assert!(details.contains("Date:        01/05/2024"));
    }

    #[test]
    fn test_summary_formatting() {
        let settings = Settings::default();
        assert_eq!(format_summary(None, &settings), "No expenses recorded.\n");

        let summary = Summary {
            count: 2,
            total: Money::from_cents(550),
        };
        assert_eq!(
            format_summary(Some(&summary), &settings),
            "Total expenses: 2\nTotal amount:   $5.50\n"
        );
    }

    #[test]
    fn test_monthly_summary_formatting() {
        let settings = Settings::default();
        let empty = MonthlySummary {
            year: 2024,
            month: 2,
            summary: Summary::default(),
        };
        assert_eq!(
            format_monthly_summary(&empty, &settings),
            "No expenses recorded for February 2024.\n"
        );

        let may = MonthlySummary {
            year: 2024,
            month: 5,
            summary: Summary {
                count: 1,
                total: Money::from_cents(350),
            },
        };
        assert!(format_monthly_summary(&may, &settings).starts_with("Summary for May 2024\n"));
    }

    #[test]
    fn test_category_report_formatting() {
        let settings = Settings::default();
        let mut ids = IdSequence::new();
        let coffee = expense(&mut ids, "Coffee", 350, "Food");

        let empty = CategoryReport {
            category: "Travel".to_string(),
            expenses: vec![],
            summary: Summary::default(),
        };
        assert_eq!(
            format_category_report(&empty, &settings),
            "No expenses found in category 'Travel'.\n"
        );

        let report = CategoryReport {
            category: "food".to_string(),
            summary: Summary::of([&coffee]).unwrap(),
            expenses: vec![coffee],
        };
        let output = format_category_report(&report, &settings);
        assert!(output.starts_with("Expenses in category 'food':\n"));
        assert!(output.ends_with("1 expense(s), total $3.50\n"));
    }

    #[test]
    fn test_bad_date_format_falls_back() {
        let settings = Settings {
            date_format: "%Q".to_string(),
            ..Settings::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(date, &settings), "2024-05-01");

        // Time specifiers are valid strftime but a date cannot render them
        let with_time = Settings {
            date_format: "%Y-%m-%d %H:%M".to_string(),
            ..Settings::default()
        };
        assert_eq!(format_date(date, &with_time), "2024-05-01");
        assert!(format_expense_details(
            &expense(&mut IdSequence::new(), "Coffee", 350, "Food"),
            &with_time
        )
        .contains("Date:        2024-05-01"));
    }

    #[test]
    fn test_list_total_overflow_does_not_panic() {
        let mut ids = IdSequence::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let huge = Money::parse("50000000000000000").unwrap();
        let expenses = vec![
            Expense::new(&mut ids, "Yacht", huge, date, "Toys").unwrap(),
            Expense::new(&mut ids, "Island", huge, date, "Toys").unwrap(),
        ];

        let output = format_expense_list(&expenses, &Settings::default());
        assert!(output.ends_with("2 expense(s), Total amount is too large to compute\n"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
        assert_eq!(truncate("ééééééééééééé", 5), "éé...");
    }
}
