//! Interactive numbered menu
//!
//! The menu reads choices and field values line by line, re-prompting until
//! each value is usable. Choosing exit (or reaching the end of input) performs
//! a final save.

use std::io::{BufRead, Write};

use chrono::{Datelike, NaiveDate};

use crate::config::settings::Settings;
use crate::display::{
    format_category_report, format_expense_details, format_expense_list, format_money,
    format_monthly_summary, format_summary,
};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{validate_category, validate_name, ExpenseValidationError};
use crate::services::{
    CreateExpenseInput, ExpenseService, ExpenseWarning, SummaryService, UpdateExpenseInput,
};
use crate::storage::{ExpenseSelector, Storage};

use super::expense::parse_amount;

const MENU: &str = "\n    M E N U\n\
                    ===================\n\
                    [1].......Add Expense\n\
                    [2].......Update Expense\n\
                    [3].......Delete Expense\n\
                    [4].......View Expenses\n\
                    [5].......View Summary of Expenses\n\
                    [6].......View Summary of Expenses for a Specific Month\n\
                    [7].......Filter Expenses by Category\n\
                    [9].......Exit App\n";

/// Whether the menu keeps going after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Line-oriented console over any reader and writer
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, text: &str) -> ExpenseResult<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn show(&mut self, text: &str) -> ExpenseResult<()> {
        write!(self.output, "{}", text)?;
        Ok(())
    }

    /// Print a prompt and read one trimmed line; `None` at end of input
    fn prompt(&mut self, label: &str) -> ExpenseResult<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until `parse` accepts the line
    fn prompt_until<T>(
        &mut self,
        label: &str,
        mut parse: impl FnMut(&str) -> Result<T, String>,
    ) -> ExpenseResult<Option<T>> {
        loop {
            let Some(line) = self.prompt(label)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(message) => self.say(&message)?,
            }
        }
    }

    /// Prompt for a 1-based position; `0` cancels
    fn prompt_position(&mut self, label: &str, len: usize) -> ExpenseResult<Option<usize>> {
        self.prompt_until(label, |line| match line.parse::<usize>() {
            Ok(n) if n <= len => Ok(n),
            Ok(_) => Err("Invalid choice. Please enter the number of an existing expense.".into()),
            Err(_) => Err("Invalid choice. Please enter a number.".into()),
        })
    }
}

/// Interactive menu session over a loaded store
pub struct Menu<'a, R, W> {
    storage: &'a mut Storage,
    settings: &'a Settings,
    today: NaiveDate,
    console: Console<R, W>,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Create a menu session reading from `input` and writing to `output`
    pub fn new(
        storage: &'a mut Storage,
        settings: &'a Settings,
        today: NaiveDate,
        input: R,
        output: W,
    ) -> Self {
        Self {
            storage,
            settings,
            today,
            console: Console { input, output },
        }
    }

    /// Run until the user exits, then save
    ///
    /// Failed actions are reported and the menu continues; only console
    /// failures and the final save end the session with an error.
    pub fn run(mut self) -> ExpenseResult<()> {
        loop {
            self.console.show(MENU)?;
            let Some(choice) = self.console.prompt("\nEnter your choice: ")? else {
                break;
            };

            let result = match choice.as_str() {
                "1" => self.add(),
                "2" => self.update(),
                "3" => self.delete(),
                "4" => self.view(),
                "5" => self.summary(),
                "6" => self.month_summary(),
                "7" => self.filter_by_category(),
                "9" => {
                    self.console.say("Exiting...")?;
                    break;
                }
                _ => {
                    self.console.say("Invalid choice!")?;
                    Ok(Flow::Continue)
                }
            };

            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e @ ExpenseError::Io(_)) => return Err(e),
                Err(e) => {
                    tracing::warn!(error = %e, "menu action failed");
                    self.console.say(&format!("Error: {}", e))?;
                }
            }
        }

        self.storage.save_all()?;
        tracing::info!("final save complete");
        Ok(())
    }

    fn add(&mut self) -> ExpenseResult<Flow> {
        self.console.say("\n--------------------")?;
        let Some(name) = self
            .console
            .prompt_until("Enter expense name: ", text_field(validate_name))?
        else {
            return Ok(Flow::Exit);
        };

        let Some(amount) = self.console.prompt_until("Enter amount: ", |line| {
            parse_amount(line).map_err(|e| format!("{} Please try again.", e))
        })?
        else {
            return Ok(Flow::Exit);
        };

        let Some(date) = self.console.prompt(
            "Enter the date of the expense (yyyy-mm-dd) or leave empty to default to today: ",
        )?
        else {
            return Ok(Flow::Exit);
        };

        let Some(category) = self
            .console
            .prompt_until("Enter expense category: ", text_field(validate_category))?
        else {
            return Ok(Flow::Exit);
        };

        let outcome = ExpenseService::with_today(self.storage, self.today).add(
            CreateExpenseInput {
                name,
                amount,
                date: Some(date),
                category,
            },
        )?;

        self.warn(&outcome.warnings)?;
        self.console.say(&format!(
            "Expense added successfully ({}).",
            outcome.value.id()
        ))?;
        Ok(Flow::Continue)
    }

    fn update(&mut self) -> ExpenseResult<Flow> {
        self.console.say("\n    Update Expenses\n==============================")?;
        let len = self.storage.expenses.count()?;
        if len == 0 {
            self.console.say("There are no expenses.")?;
            return Ok(Flow::Continue);
        }
        self.list()?;

        let Some(position) = self.console.prompt_position(
            "\nEnter the number of the expense you want to update (or enter 0 to cancel): ",
            len,
        )?
        else {
            return Ok(Flow::Exit);
        };
        if position == 0 {
            return Ok(Flow::Continue);
        }
        let selector = ExpenseSelector::Position(position);

        let current = self.storage.expenses.get(selector)?.clone();
        self.console
            .show(&format_expense_details(&current, self.settings))?;

        let Some(confirm) = self
            .console
            .prompt("\nAre you sure you want to edit this expense? [Y/N]: ")?
        else {
            return Ok(Flow::Exit);
        };
        if !confirm.eq_ignore_ascii_case("y") {
            self.console.say("Updating was canceled.")?;
            return Ok(Flow::Continue);
        }

        self.console
            .say("\nTo keep the current value simply press Enter.\n")?;

        let Some(name) = self.console.prompt_until(
            &format!("New description ({}): ", current.name()),
            optional_text_field(validate_name),
        )?
        else {
            return Ok(Flow::Exit);
        };

        let Some(amount) = self.console.prompt_until(
            &format!(
                "New amount ({}): ",
                format_money(current.amount(), self.settings)
            ),
            |line| {
                if line.is_empty() {
                    return Ok(None);
                }
                parse_amount(line)
                    .map(Some)
                    .map_err(|e| format!("{} Please try again.", e))
            },
        )?
        else {
            return Ok(Flow::Exit);
        };

        let Some(date) = self
            .console
            .prompt(&format!("New date ({}): ", current.date()))?
        else {
            return Ok(Flow::Exit);
        };

        let Some(category) = self.console.prompt_until(
            &format!("New category ({}): ", current.category()),
            optional_text_field(validate_category),
        )?
        else {
            return Ok(Flow::Exit);
        };

        let outcome = ExpenseService::with_today(self.storage, self.today).update(
            selector,
            UpdateExpenseInput {
                name,
                amount,
                date: Some(date),
                category,
            },
        )?;

        self.warn(&outcome.warnings)?;
        self.console.say("The expense was updated successfully.")?;
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> ExpenseResult<Flow> {
        let len = self.storage.expenses.count()?;
        if len == 0 {
            self.console.say("No expenses to delete.")?;
            return Ok(Flow::Continue);
        }

        self.console
            .say("\nSelect the number of the expense you want to delete")?;
        self.list()?;

        let Some(position) = self.console.prompt_position(
            "\nEnter the number of the expense you want to delete (or enter 0 to cancel): ",
            len,
        )?
        else {
            return Ok(Flow::Exit);
        };
        if position == 0 {
            return Ok(Flow::Continue);
        }

        let deleted = ExpenseService::with_today(self.storage, self.today)
            .delete(ExpenseSelector::Position(position))?;
        self.console.say(&format!(
            "Expense deleted successfully! ({}: {})",
            deleted.id(),
            deleted.name()
        ))?;
        Ok(Flow::Continue)
    }

    fn view(&mut self) -> ExpenseResult<Flow> {
        self.console.say("\nYour expenses:")?;
        self.list()?;
        Ok(Flow::Continue)
    }

    fn summary(&mut self) -> ExpenseResult<Flow> {
        let summary = SummaryService::new(self.storage).summary()?;
        self.console
            .say("\nSummary of Expenses\n=====================")?;
        self.console
            .show(&format_summary(summary.as_ref(), self.settings))?;
        Ok(Flow::Continue)
    }

    fn month_summary(&mut self) -> ExpenseResult<Flow> {
        let year = self.today.year();
        let service = SummaryService::new(self.storage);

        self.console.say("\nExpenses by Month\n=================")?;
        let Some(monthly) = self.console.prompt_until(
            "\nSelect the month for which you want to see the total expenses (1 - 12): ",
            |line| {
                let month = line
                    .parse::<u32>()
                    .map_err(|_| "Invalid input. Please enter a number between 1 and 12.")?;
                // Only an out-of-range month is worth asking again
                match service.summary_for_month(year, month) {
                    Err(ExpenseError::InvalidMonth(_)) => Err(
                        "Invalid month number. Please enter a number between 1 and 12."
                            .to_string(),
                    ),
                    other => Ok(other),
                }
            },
        )?
        else {
            return Ok(Flow::Exit);
        };
        let monthly = monthly?;

        self.console
            .show(&format_monthly_summary(&monthly, self.settings))?;
        Ok(Flow::Continue)
    }

    fn filter_by_category(&mut self) -> ExpenseResult<Flow> {
        self.console.say("\n------------------------------")?;
        let Some(category) = self
            .console
            .prompt_until("Enter category to filter by: ", text_field(validate_category))?
        else {
            return Ok(Flow::Exit);
        };

        let report = SummaryService::new(self.storage).filter_by_category(&category)?;
        self.console
            .show(&format_category_report(&report, self.settings))?;
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> ExpenseResult<()> {
        let text = format_expense_list(self.storage.expenses.get_all()?, self.settings);
        self.console.show(&text)
    }

    fn warn(&mut self, warnings: &[ExpenseWarning]) -> ExpenseResult<()> {
        for warning in warnings {
            self.console.say(&warning.to_string())?;
        }
        Ok(())
    }
}

/// Run the menu on standard input and output
pub fn run_menu(storage: &mut Storage, settings: &Settings) -> ExpenseResult<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let today = chrono::Local::now().date_naive();

    Menu::new(storage, settings, today, stdin.lock(), stdout.lock()).run()
}

fn text_field(
    validate: fn(&str) -> Result<String, ExpenseValidationError>,
) -> impl FnMut(&str) -> Result<String, String> {
    move |line| validate(line).map_err(|e| format!("{}.", e))
}

fn optional_text_field(
    validate: fn(&str) -> Result<String, ExpenseValidationError>,
) -> impl FnMut(&str) -> Result<Option<String>, String> {
    move |line| {
        if line.is_empty() {
            Ok(None)
        } else {
            validate(line).map(Some).map_err(|e| format!("{}.", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::TrackerPaths;
    use crate::models::ExpenseId;
    use std::fs;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    fn open(temp_dir: &TempDir) -> Storage {
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        Storage::open(paths).unwrap().0
    }

    fn run(temp_dir: &TempDir, script: &str) -> String {
        let mut storage = open(temp_dir);
        let settings = Settings::default();
        let mut output = Vec::new();

        Menu::new(
            &mut storage,
            &settings,
            today(),
            script.as_bytes(),
            &mut output,
        )
        .run()
        .unwrap();

        String::from_utf8(output).unwrap()
    }

    fn saved(temp_dir: &TempDir) -> String {
        fs::read_to_string(temp_dir.path().join("expenses.csv")).unwrap()
    }

    #[test]
    fn test_add_and_exit() {
        let temp_dir = TempDir::new().unwrap();
        let output = run(&temp_dir, "1\nCoffee\n3.50\n2024-05-01\nFood\n9\n");

        assert!(output.contains("Expense added successfully (1)."));
        assert!(output.contains("Exiting..."));
        assert_eq!(saved(&temp_dir), "1,Coffee,3.50,2024-05-01,Food\n");
    }

    #[test]
    fn test_add_reprompts_invalid_fields() {
        let temp_dir = TempDir::new().unwrap();
        let output = run(
            &temp_dir,
            "1\n\nCoffee, large\nCoffee\nabc\n0\n3.5\nnot-a-date\n\nFood\n9\n",
        );

        assert!(output.contains("Description cannot be empty."));
        assert!(output.contains("The name cannot contain ','"));
        assert!(output.contains("Invalid amount 'abc'"));
        assert!(output.contains("Amount must be greater than zero"));
        assert!(output.contains("Category cannot be empty."));
        assert!(output.contains("Using today's date (2024-05-20) instead."));
        assert_eq!(saved(&temp_dir), "1,Coffee,3.50,2024-05-20,Food\n");
    }

    #[test]
    fn test_invalid_choice() {
        let temp_dir = TempDir::new().unwrap();
        let output = run(&temp_dir, "8\nabc\n9\n");

        assert_eq!(output.matches("Invalid choice!").count(), 2);
    }

    #[test]
    fn test_update_keeps_blank_fields() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("expenses.csv"),
            "1,Coffee,3.50,2024-05-01,Food\n",
        )
        .unwrap();

        let output = run(&temp_dir, "2\n5\n1\ny\n\n4.25\nsoon\n\n9\n");

        assert!(output.contains("Please enter the number of an existing expense."));
        assert!(output.contains("Keeping previous date (2024-05-01)."));
        assert!(output.contains("The expense was updated successfully."));
        assert_eq!(saved(&temp_dir), "1,Coffee,4.25,2024-05-01,Food\n");
    }

    #[test]
    fn test_update_canceled() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("expenses.csv"),
            "1,Coffee,3.50,2024-05-01,Food\n",
        )
        .unwrap();

        let output = run(&temp_dir, "2\n1\nn\n9\n");

        assert!(output.contains("Updating was canceled."));
        assert_eq!(saved(&temp_dir), "1,Coffee,3.50,2024-05-01,Food\n");
    }

    #[test]
    fn test_delete_then_add_continues_ids() {
        let temp_dir = TempDir::new().unwrap();
        run(
            &temp_dir,
            "1\nCoffee\n3.50\n2024-05-01\nFood\n1\nBus\n2\n2024-05-02\nTransport\n3\nx\n1\n9\n",
        );
        assert_eq!(saved(&temp_dir), "2,Bus,2.00,2024-05-02,Transport\n");

        let output = run(&temp_dir, "1\nLunch\n12\n\nFood\n9\n");
        assert!(output.contains("Expense added successfully (3)."));

        let storage = open(&temp_dir);
        let ids: Vec<_> = storage
            .expenses
            .get_all()
            .unwrap()
            .iter()
            .map(|e| e.id())
            .collect();
        assert_eq!(ids, vec![ExpenseId::new(2), ExpenseId::new(3)]);
    }

    #[test]
    fn test_delete_on_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let output = run(&temp_dir, "3\n9\n");

        assert!(output.contains("No expenses to delete."));
    }

    #[test]
    fn test_summaries() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("expenses.csv"),
            "1,Coffee,3.50,2024-05-01,Food\n\
             2,Bus,2.00,2024-05-02,Transport\n\
             3,Rent,900.00,2023-05-01,Housing\n",
        )
        .unwrap();

        let output = run(&temp_dir, "5\n6\n13\nmay\n5\n7\nFOOD\n9\n");

        assert!(output.contains("Total expenses: 3\nTotal amount:   $905.50"));
        assert!(output.contains("Invalid month number."));
        assert!(output.contains("Invalid input. Please enter a number between 1 and 12."));
        // Only the current year counts
        assert!(output.contains("Summary for May 2024\nTotal expenses: 2\nTotal amount:   $5.50"));
        assert!(output.contains("Expenses in category 'FOOD':"));
        assert!(output.contains("1 expense(s), total $3.50"));
    }

    #[test]
    fn test_summary_with_no_data() {
        let temp_dir = TempDir::new().unwrap();
        let output = run(&temp_dir, "5\n4\n9\n");

        assert!(output.contains("No expenses recorded."));
    }

    #[test]
    fn test_end_of_input_saves() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("expenses.csv"),
            "1,Coffee,3.5,2024-05-01,Food\n",
        )
        .unwrap();

        run(&temp_dir, "4\n");

        // Final save rewrites in the canonical format
        assert_eq!(saved(&temp_dir), "1,Coffee,3.50,2024-05-01,Food\n");
    }

    #[test]
    fn test_end_of_input_mid_action() {
        let temp_dir = TempDir::new().unwrap();
        let output = run(&temp_dir, "1\nCoffee\n");

        assert!(!output.contains("Expense added"));
        assert_eq!(saved(&temp_dir), "");
    }
}
