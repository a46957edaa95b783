use clap::{Parser, Subcommand, ValueEnum};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use crate::config::Config;
use crate::error::{QuoteError, Result};
use crate::quote::{ClientField, QuoteForm, Visibility};
use crate::report::{print_quote, ReportSnapshot};

/// One line typed at the session prompt
#[derive(Parser, Debug)]
#[command(
    name = "quote",
    no_binary_name = true,
    disable_version_flag = true
)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Set a client field
    Client {
        field: ClientFieldArg,
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        value: Vec<String>,
    },

    /// Set the quote date (YYYY-MM-DD) or 'clear' it
    Date { value: String },

    /// Select a service (by id or serv_/val_/desc_ field id)
    Check { service: String },

    /// Deselect a service; its detail text is discarded
    Uncheck { service: String },

    /// Type into a service's amount field
    Amount {
        service: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Type into a selected service's detail field
    Detail {
        service: String,
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Add a material/part line item
    Add {
        description: String,
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Edit the amount of the item at a table position
    Edit {
        position: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Remove the item at a table position
    Remove { position: String },

    /// Type into the miscellaneous costs field
    Misc {
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Set the additional notes
    Notes {
        #[arg(num_args = 0.., allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Show the whole form
    Show,

    /// Show the running total
    Total,

    /// Write the printable quote and open it in the browser
    Print {
        /// Only write the file
        #[arg(long)]
        no_open: bool,
    },

    /// Dump the report snapshot as JSON
    Json,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ClientFieldArg {
    Name,
    Address,
    Phone,
}

impl From<ClientFieldArg> for ClientField {
    fn from(arg: ClientFieldArg) -> Self {
        match arg {
            ClientFieldArg::Name => ClientField::Name,
            ClientFieldArg::Address => ClientField::Address,
            ClientFieldArg::Phone => ClientField::Phone,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = " ")]
    selected: &'static str,
    #[tabled(rename = "ID")]
    id: &'static str,
    #[tabled(rename = "SERVICE")]
    label: &'static str,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "DETAIL")]
    detail: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

/// Owns the form for as long as the user keeps the session open
pub struct Session {
    form: QuoteForm,
    config: Config,
    output_dir: PathBuf,
}

impl Session {
    pub fn new(config: Config, output_dir: PathBuf) -> Self {
        let form = QuoteForm::new(config.currency.clone());
        Self {
            form,
            config,
            output_dir,
        }
    }

    pub fn form(&self) -> &QuoteForm {
        &self.form
    }

    /// Run one command line against the form
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> Result<Flow> {
        let args = split_args(line)?;
        if args.is_empty() {
            return Ok(Flow::Continue);
        }

        let parsed = match SessionLine::try_parse_from(&args) {
            Ok(parsed) => parsed,
            Err(e) if matches!(e.kind(), clap::error::ErrorKind::DisplayHelp) => {
                write!(out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
            Err(e) => {
                let rendered = e.render().to_string();
                let message = rendered.lines().next().unwrap_or("invalid command");
                let message = message.trim_start_matches("error: ").to_string();
                return Err(QuoteError::InvalidCommand(format!(
                    "{message} (type 'help' for commands)"
                )));
            }
        };

        match parsed.command {
            SessionCommand::Client { field, value } => {
                self.form.set_client_field(field.into(), &value.join(" "));
            }
            SessionCommand::Date { value } => {
                let value = if value == "clear" { "" } else { value.as_str() };
                self.form.set_date(value)?;
            }
            SessionCommand::Check { service } => {
                self.form.set_service_checked(&service, true)?;
                self.write_total(out)?;
            }
            SessionCommand::Uncheck { service } => {
                self.form.set_service_checked(&service, false)?;
                self.write_total(out)?;
            }
            SessionCommand::Amount { service, value } => {
                self.form.set_service_amount(&service, &value)?;
                self.write_total(out)?;
            }
            SessionCommand::Detail { service, text } => {
                self.form.set_service_detail(&service, &text.join(" "))?;
            }
            SessionCommand::Add {
                description,
                amount,
            } => {
                let input = self.form.items_input_mut();
                input.description = description;
                input.amount = amount;
                self.form.add_item()?;
                self.write_total(out)?;
            }
            SessionCommand::Edit { position, value } => {
                let id = self.form.resolve_item(&position)?;
                let result = self.form.edit_item(id, &value);
                self.write_total(out)?;
                result?;
            }
            SessionCommand::Remove { position } => {
                let id = self.form.resolve_item(&position)?;
                let removed = self.form.remove_item(id)?;
                writeln!(out, "Removed '{}'", removed.description)?;
                self.write_total(out)?;
            }
            SessionCommand::Misc { value } => {
                self.form.set_misc_cost(&value);
                self.write_total(out)?;
            }
            SessionCommand::Notes { text } => {
                self.form.set_notes(&text.join(" "));
            }
            SessionCommand::Show => self.write_form(out)?,
            SessionCommand::Total => self.write_total(out)?,
            SessionCommand::Print { no_open } => {
                let path = print_quote(&self.form, &self.config, &self.output_dir, !no_open)?;
                writeln!(out, "Saved quote to {}", path.display())?;
            }
            SessionCommand::Json => {
                let snapshot = ReportSnapshot::capture(&self.form);
                writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?;
            }
            SessionCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn write_total(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "Total: {}", self.form.total_display())?;
        Ok(())
    }

    fn write_form(&self, out: &mut impl Write) -> Result<()> {
        let fmt = self.form.formatter();
        let client = self.form.client();
        let placeholder = |value: &str| {
            if value.trim().is_empty() {
                "-".to_string()
            } else {
                value.to_string()
            }
        };

        writeln!(out, "Client:  {}", placeholder(&client.name))?;
        writeln!(out, "Address: {}", placeholder(&client.address))?;
        writeln!(out, "Phone:   {}", placeholder(&client.phone))?;
        let date = self
            .form
            .date()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "Date:    {date}")?;

        let services: Vec<ServiceRow> = self
            .form
            .services()
            .iter()
            .map(|s| ServiceRow {
                selected: if s.checked { "[x]" } else { "[ ]" },
                id: s.def.id,
                label: s.def.label,
                amount: s.amount.clone(),
                detail: match s.detail.visibility {
                    Visibility::Visible => s.detail.text.clone(),
                    Visibility::Hidden => String::new(),
                },
            })
            .collect();
        let table = Table::new(services).with(Style::rounded()).to_string();
        writeln!(out, "{table}")?;

        if self.form.items().is_empty() {
            writeln!(out, "No line items.")?;
        } else {
            let items: Vec<ItemRow> = self
                .form
                .items()
                .iter()
                .enumerate()
                .map(|(idx, item)| ItemRow {
                    index: idx + 1,
                    description: item.description.clone(),
                    amount: item.cell.clone(),
                })
                .collect();
            let table = Table::new(items).with(Style::rounded()).to_string();
            writeln!(out, "{table}")?;
        }

        writeln!(out, "Misc:    {}", fmt.format_text(self.form.misc_cost()))?;
        if !self.form.notes().trim().is_empty() {
            writeln!(out, "Notes:   {}", self.form.notes())?;
        }
        self.write_total(out)
    }
}

/// Drive a session from `input` until it is exhausted or the user quits.
/// Form errors are reported on stderr and the session carries on.
pub fn run_session(
    session: &mut Session,
    input: impl BufRead,
    out: &mut impl Write,
    prompt: bool,
) -> Result<()> {
    tracing::debug!("session started");
    if prompt {
        write!(out, "quote> ")?;
        out.flush()?;
    }
    for line in input.lines() {
        let line = line?;
        match session.execute(&line, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(QuoteError::Io(e)) => return Err(QuoteError::Io(e)),
            Err(e) => {
                tracing::debug!(error = %e, validation = e.is_validation(), "command rejected");
                eprintln!("Error: {e}");
            }
        }
        if prompt {
            write!(out, "quote> ")?;
            out.flush()?;
        }
    }
    tracing::debug!(total = session.form().total(), "session ended");
    Ok(())
}

/// Split a command line into words; single or double quotes group words
/// and a backslash escapes the next character
pub fn split_args(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some('"') | None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(ch);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(QuoteError::InvalidCommand(format!("unterminated quote in: {line}")));
    }
    if in_word {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> Session {
        Session::new(Config::default(), dir.path().join("output"))
    }

    fn run(session: &mut Session, line: &str) -> (Result<Flow>, String) {
        let mut out = Vec::new();
        let result = session.execute(line, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn splits_quoted_words() {
        assert_eq!(split_args("add Fechadura 45.50").unwrap(), ["add", "Fechadura", "45.50"]);
        assert_eq!(
            split_args(r#"add "Fita isolante" '12,5'"#).unwrap(),
            ["add", "Fita isolante", "12,5"]
        );
        assert_eq!(split_args(r#"notes "say \"hi\"""#).unwrap(), ["notes", r#"say "hi""#]);
        assert_eq!(split_args(r#"client name """#).unwrap(), ["client", "name", ""]);
        assert!(split_args("   ").unwrap().is_empty());
        assert!(split_args("add \"open").is_err());
    }

    #[test]
    fn maria_session() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        for line in [
            "client name Maria",
            "date 2024-03-05",
            "check cameras",
            "amount val_cameras 150.00",
            "detail desc_cameras trocar fechadura",
            "add Fechadura 45.50",
        ] {
            assert_eq!(run(&mut s, line).0.unwrap(), Flow::Continue);
        }
        let (result, out) = run(&mut s, "misc 20");
        result.unwrap();
        assert_eq!(out, "Total: R$\u{a0}215,50\n");

        let (result, out) = run(&mut s, "print --no-open");
        result.unwrap();
        assert!(out.starts_with("Saved quote to "));
        let written = std::fs::read_dir(dir.path().join("output")).unwrap().count();
        assert_eq!(written, 1);
    }

    #[test]
    fn rejected_add_reports_validation_error() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        let (result, _) = run(&mut s, "add Cabo -3");
        assert!(result.unwrap_err().is_validation());
        let (result, _) = run(&mut s, r#"add "" 3"#);
        assert!(result.unwrap_err().is_validation());
        assert!(s.form().items().is_empty());
    }

    #[test]
    fn invalid_edit_still_reports_total() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        run(&mut s, "add Cabo 10").0.unwrap();
        let (result, out) = run(&mut s, "edit 1 -4");
        assert!(matches!(result, Err(QuoteError::InvalidItemAmount(_))));
        assert_eq!(out, "Total: R$\u{a0}0,00\n");
        assert_eq!(s.form().items()[0].cell, "0.00");
    }

    #[test]
    fn remove_by_position() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        run(&mut s, "add Cabo 10").0.unwrap();
        run(&mut s, "add Fita 2").0.unwrap();
        let (result, out) = run(&mut s, "remove 1");
        result.unwrap();
        assert!(out.contains("Removed 'Cabo'"));
        assert_eq!(s.form().items()[0].description, "Fita");
        assert!(matches!(run(&mut s, "remove 5").0, Err(QuoteError::UnknownRow(_))));
    }

    #[test]
    fn uncheck_discards_detail() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        run(&mut s, "check cerca").0.unwrap();
        run(&mut s, "detail cerca fio novo").0.unwrap();
        run(&mut s, "uncheck serv_cerca").0.unwrap();
        run(&mut s, "check cerca").0.unwrap();
        assert!(s.form().service("cerca").unwrap().detail.text.is_empty());
    }

    #[test]
    fn show_and_json() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        run(&mut s, "check instalacao").0.unwrap();
        run(&mut s, "add Disjuntor 32").0.unwrap();

        let (result, out) = run(&mut s, "show");
        result.unwrap();
        assert!(out.contains("[x]"));
        assert!(out.contains("instalacao"));
        assert!(out.contains("Disjuntor"));
        assert!(out.contains("32.00"));

        let (result, out) = run(&mut s, "json");
        result.unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["categories"][0]["category"], "Serviços Elétricos");
        assert_eq!(value["items"][0]["description"], "Disjuntor");
    }

    #[test]
    fn unknown_commands_and_quit() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        assert!(matches!(run(&mut s, "frobnicate").0, Err(QuoteError::InvalidCommand(_))));
        assert!(matches!(run(&mut s, "check alarme").0, Err(QuoteError::UnknownService(_))));
        assert_eq!(run(&mut s, "").0.unwrap(), Flow::Continue);
        assert_eq!(run(&mut s, "exit").0.unwrap(), Flow::Quit);
        assert_eq!(run(&mut s, "quit").0.unwrap(), Flow::Quit);
    }

    #[test]
    fn run_session_continues_after_errors() {
        let dir = TempDir::new().unwrap();
        let mut s = session(&dir);
        let input = "add Cabo 0\nadd Cabo 5\nbogus\nmisc 1\nquit\nadd Fita 9\n";
        let mut out = Vec::new();
        run_session(&mut s, input.as_bytes(), &mut out, false).unwrap();

        assert_eq!(s.form().items().len(), 1);
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("Total: R$\u{a0}6,00\n"));
    }
}
