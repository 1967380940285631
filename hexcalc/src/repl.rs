// Allow unused assignments - required by miette::Diagnostic derive macro
#![allow(unused_assignments)]

use std::path::Path;

use hexcalc_core::{Calculator, CalculatorOptions, LayoutError, RegisterLayout};
use miette::{Diagnostic, IntoDiagnostic, Report};
use rustyline::{DefaultEditor, error::ReadlineError};
use yansi::Paint;

use crate::{cli::HexcalcCli, command::Command, help, render};

// SESSION ERROR
// ================================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum SessionError {
    #[error("help on that topic not available")]
    NoHelp,
    #[error("need to load register specs first")]
    #[diagnostic(help("load a register specs file with the 'R' command"))]
    NoLayout,
    #[error("no register has been printed yet")]
    NothingToRepeat,
}

// SESSION
// ================================================================================================

/// What the read loop should do after a line was executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text (if any) and read the next line.
    Continue(String),
    Quit,
}

/// A calculator together with the register layout and the state of the `S` command.
#[derive(Debug, Default)]
pub struct Session {
    calc: Calculator,
    layout: Option<RegisterLayout>,
    last_register: Option<String>,
}

impl Session {
    pub fn new(options: CalculatorOptions) -> Self {
        Self {
            calc: Calculator::new(options),
            layout: None,
            last_register: None,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calc
    }

    pub fn layout(&self) -> Option<&RegisterLayout> {
        self.layout.as_ref()
    }

    /// Loads the layout at `path` and returns the list of its registers.
    ///
    /// On failure the previously loaded layout stays in effect.
    pub fn load_layout(&mut self, path: &Path) -> Result<String, LayoutError> {
        let layout = RegisterLayout::load(path)?;
        let names = render::register_names(layout.names());
        self.layout = Some(layout);
        Ok(names)
    }

    /// Parses and executes one line of input.
    pub fn execute_line(&mut self, line: &str) -> Result<Outcome, Report> {
        match Command::parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::Continue(String::new())),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Outcome, Report> {
        let calc = &mut self.calc;
        match command {
            Command::Quit => return Ok(Outcome::Quit),
            Command::Help(None) => return Ok(Outcome::Continue(help::main_help())),
            Command::Help(Some(name)) => {
                let text = help::command_help(&name).ok_or(SessionError::NoHelp)?;
                return Ok(Outcome::Continue(text));
            },
            Command::Version => return Ok(Outcome::Continue(help::version_text())),
            Command::Print => {},
            Command::Highlight(a, b) => {
                return Ok(Outcome::Continue(render::value(&calc.report(Some((a, b)))?)));
            },
            Command::Assign(literal) => calc.assign(&literal)?,
            Command::ToggleIndices => calc.toggle_indices(),
            Command::PermanentHighlight(None) => calc.clear_permanent_highlight(),
            Command::PermanentHighlight(Some((a, b))) => calc.set_permanent_highlight(a, b)?,
            Command::Width(None) => {
                return Ok(Outcome::Continue(render::width(calc.state().width())));
            },
            Command::Width(Some(width)) => calc.set_width(width)?,
            Command::Invert(None) => calc.invert_all()?,
            Command::Invert(Some((a, b))) => calc.invert(a, b)?,
            Command::Replace(literal) => calc.replace(&literal)?,
            Command::Undo => calc.undo()?,
            Command::Redo => calc.redo()?,
            Command::UndoCapacity(None) => {
                return Ok(Outcome::Continue(calc.history_capacity().to_string()));
            },
            Command::UndoCapacity(Some(capacity)) => {
                calc.resize_history(capacity)?;
                let text = format!("undo history capacity set to {}", calc.history_capacity());
                return Ok(Outcome::Continue(text));
            },
            Command::PrintHistory => {
                return Ok(Outcome::Continue(render::history(&calc.checkpoints())));
            },
            Command::Decode(None) => {
                let layout = self.layout.as_ref().ok_or(SessionError::NoLayout)?;
                return Ok(Outcome::Continue(render::register_names(layout.names())));
            },
            Command::Decode(Some(name)) => {
                let text = self.decode(&name)?;
                self.last_register = Some(name);
                return Ok(Outcome::Continue(text));
            },
            Command::RepeatDecode => {
                self.layout.as_ref().ok_or(SessionError::NoLayout)?;
                let name = self.last_register.clone().ok_or(SessionError::NothingToRepeat)?;
                return Ok(Outcome::Continue(self.decode(&name)?));
            },
            Command::LoadLayout(path) => {
                return Ok(Outcome::Continue(self.load_layout(&path)?));
            },
        }
        Ok(Outcome::Continue(render::value(&self.calc.report(None)?)))
    }

    fn decode(&self, name: &str) -> Result<String, Report> {
        let layout = self.layout.as_ref().ok_or(SessionError::NoLayout)?;
        Ok(render::register(&self.calc.decode_register(layout, name)?))
    }
}

// READ LOOP
// ================================================================================================

/// Runs the interactive calculator until `q` or end of input.
pub fn run(cli: &HexcalcCli) -> Result<(), Report> {
    let mut session = Session::new(cli.options()?);
    let mut editor = DefaultEditor::new().into_diagnostic()?;

    let history_path = cli.history_path();
    if let Some(path) = &history_path {
        if let Err(err) = editor.load_history(path) {
            log::debug!("no input history loaded from '{}': {err}", path.display());
        }
    }

    println!("{}\n\n{}", help::version_text(), help::intro());
    if let Some(path) = &cli.specs_file {
        println!("\nAutoloading specs file {}", path.display());
        match session.load_layout(path) {
            Ok(names) => println!("{names}"),
            Err(err) => println!("Failed to load specs file: {}", render::error(&Report::new(err))),
        }
    }

    let prompt = format!("{} ", "hex-calc>".bold().blue());
    loop {
        println!();
        match editor.readline(&prompt) {
            Ok(line) => {
                if !line.trim().is_empty()
                    && let Err(err) = editor.add_history_entry(line.as_str())
                {
                    log::debug!("failed to add line to input history: {err}");
                }
                match session.execute_line(&line) {
                    Ok(Outcome::Continue(text)) if text.is_empty() => {},
                    Ok(Outcome::Continue(text)) => println!("{text}"),
                    Ok(Outcome::Quit) => break,
                    Err(report) => println!("{}", render::error(&report)),
                }
            },
            // Ctrl-C discards the line being edited
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err).into_diagnostic(),
        }
    }

    if let Some(path) = history_path {
        save_history(&mut editor, &path);
    }
    Ok(())
}

fn save_history(editor: &mut DefaultEditor, path: &Path) {
    if let Err(err) = editor.save_history(path) {
        log::warn!("failed to save input history to '{}': {err}", path.display());
    }
}

// TESTS
// ================================================================================================

#[cfg(test)]
mod tests {
    use std::io::Write;

    use hexcalc_core::{CalcError, HistoryError};

    use super::*;

    fn run_lines(session: &mut Session, lines: &[&str]) -> Vec<Result<Outcome, Report>> {
        lines.iter().map(|line| session.execute_line(line)).collect()
    }

    fn text(outcome: Result<Outcome, Report>) -> String {
        match outcome {
            Ok(Outcome::Continue(text)) => text,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    fn error<E: Diagnostic + Clone + Send + Sync + 'static>(outcome: Result<Outcome, Report>) -> E {
        let report = outcome.unwrap_err();
        match report.downcast_ref::<E>() {
            Some(err) => err.clone(),
            None => panic!("unexpected error {report:?}"),
        }
    }

    #[test]
    fn mutations_print_the_accumulator() {
        yansi::disable();
        let mut session = Session::default();
        let out = text(session.execute_line("ff"));
        assert!(out.starts_with("decimal: 255"));
        assert!(out.contains("1111 1111"));

        let out = text(session.execute_line("i 0 7"));
        assert!(out.starts_with("decimal: 0\n"));
        assert_eq!(session.calculator().state().hex(), "00000000");
    }

    #[test]
    fn queries() {
        let mut session = Session::default();
        assert_eq!(text(session.execute_line("w")), "8");
        assert_eq!(text(session.execute_line("U")), "14");
        session.execute_line("w 0").unwrap();
        assert_eq!(text(session.execute_line("w")), "variable");
        assert_eq!(text(session.execute_line("U 3")), "undo history capacity set to 3");
        assert_eq!(text(session.execute_line("H")), "undo history:\n-> 0  wd(0)  idx");
        assert_eq!(text(session.execute_line("")), "");
        assert_eq!(session.execute_line("q").unwrap(), Outcome::Quit);
    }

    #[test]
    fn errors_leave_state_untouched() {
        let mut session = Session::default();
        let before = session.calculator().state().clone();

        let results = run_lines(&mut session, &["u", "r", "i 40", "= 1", "w 20"]);
        let mut results = results.into_iter();
        assert_eq!(
            error::<CalcError>(results.next().unwrap()),
            CalcError::History(HistoryError::EmptyUndoHistory)
        );
        assert_eq!(
            error::<CalcError>(results.next().unwrap()),
            CalcError::History(HistoryError::EmptyRedoHistory)
        );
        assert_matches_bits(error::<CalcError>(results.next().unwrap()));
        assert_eq!(error::<CalcError>(results.next().unwrap()), CalcError::NoHighlight);
        assert_eq!(error::<CalcError>(results.next().unwrap()), CalcError::UnsupportedWidth(20));
        assert_eq!(session.calculator().state(), &before);
    }

    fn assert_matches_bits(err: CalcError) {
        assert_eq!(err, CalcError::BadInversionLimits { lo: 40, hi: 40, bits: 32 });
    }

    #[test]
    fn register_commands() {
        yansi::disable();
        let mut session = Session::default();
        assert_eq!(error::<SessionError>(session.execute_line("s")), SessionError::NoLayout);
        assert_eq!(error::<SessionError>(session.execute_line("S")), SessionError::NoLayout);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 cause\n11\n16 addr\n1 addr_valid\n4 errcode\n0").unwrap();
        let out = text(session.execute_line(&format!("R {}", file.path().display())));
        assert_eq!(out, "available register definitions:\n    cause");

        assert_eq!(error::<SessionError>(session.execute_line("S")), SessionError::NothingToRepeat);
        session.execute_line("7").unwrap();
        let out = text(session.execute_line("s cause"));
        assert!(out.contains("errcode [ 3.. 0] = 0111"));
        assert_eq!(text(session.execute_line("S")), out);

        assert_eq!(
            error::<CalcError>(session.execute_line("s status")),
            CalcError::UnknownRegister("status".into())
        );
    }

    #[test]
    fn failed_layout_load_keeps_previous_layout() {
        let mut session = Session::default();
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "0 flags\n4 nzcv\n0").unwrap();
        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "0 broken\n3 x\n0").unwrap();

        session.load_layout(good.path()).unwrap();
        assert!(session.load_layout(bad.path()).is_err());
        assert!(session.execute_line(&format!("R {}", bad.path().display())).is_err());
        assert_eq!(session.layout().unwrap().names().collect::<Vec<_>>(), ["flags"]);
    }

    #[test]
    fn help_topics() {
        let mut session = Session::default();
        assert!(text(session.execute_line("h")).contains("Undo."));
        assert!(text(session.execute_line("h U")).contains("undo history capacity"));
        assert_eq!(error::<SessionError>(session.execute_line("h x")), SessionError::NoHelp);
    }
}
