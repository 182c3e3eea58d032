//! The interactive command loop: a small state machine around one open
//! [`Database`]. `Running` reads and dispatches commands; the two confirm
//! states guard the exit path so unsaved work is never dropped silently.

pub mod export;
pub mod prompt;

use std::path::Path;

use colored::Colorize;

use crate::io::gpg;
use crate::io::paths::{self, AppPaths, PathError};
use crate::io::store::{Database, StoreError};
use crate::model::tag::Tag;
use crate::model::task::Task;
use crate::session::prompt::{Prompt, PromptError, ReadlinePrompt};

/// Error type for a whole interactive run
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

/// A parsed command keyword. Matching is case-insensitive and commands take
/// no arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Paths,
    CheckGpg,
    Export,
    Backup,
    Add,
    List,
    Save,
    Import,
    /// Quit-no-save: skip the save prompt on the way out
    Qns,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(input: &str) -> Command {
        match input.trim().to_lowercase().as_str() {
            "" => Command::Empty,
            "help" => Command::Help,
            "paths" => Command::Paths,
            "check-gpg" => Command::CheckGpg,
            "export" => Command::Export,
            "backup" => Command::Backup,
            "add" => Command::Add,
            "print" | "list" | "ls" => Command::List,
            "save" => Command::Save,
            "import" => Command::Import,
            "qns" => Command::Qns,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Session states. The loop holds exactly one of these between prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    ConfirmQuit { skip_save: bool },
    ConfirmSaveOnQuit,
    Terminated,
}

/// One interactive session over an opened database
pub struct Session<P: Prompt> {
    db: Database,
    paths: AppPaths,
    prompt: P,
    dirty: bool,
}

impl<P: Prompt> Session<P> {
    /// Wrap an opened database. A schema back-fill during open counts as an
    /// unsaved change so it reaches disk on the next save.
    pub fn new(db: Database, paths: AppPaths, prompt: P) -> Self {
        let dirty = db.migrated();
        Session {
            db,
            paths,
            prompt,
            dirty,
        }
    }

    /// Whether in-memory edits exist that the persisted file does not have
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    /// Drive the loop until it terminates. Only prompt I/O failures abort
    /// the run; command failures are reported and the loop keeps going.
    pub fn run(&mut self) -> Result<(), PromptError> {
        let mut state = State::Running;
        loop {
            state = match state {
                State::Running => self.step_running()?,
                State::ConfirmQuit { skip_save } => self.step_confirm_quit(skip_save)?,
                State::ConfirmSaveOnQuit => self.step_confirm_save()?,
                State::Terminated => break,
            };
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // State steps
    // -----------------------------------------------------------------------

    fn step_running(&mut self) -> Result<State, PromptError> {
        match self.prompt.line("> ") {
            Ok(line) => Ok(self.dispatch(Command::parse(&line))),
            // Ctrl-C while idle asks the same question quit does.
            Err(PromptError::Interrupted) => {
                println!();
                Ok(State::ConfirmQuit { skip_save: false })
            }
            Err(PromptError::Eof) => Ok(State::ConfirmQuit { skip_save: false }),
            Err(e) => Err(e),
        }
    }

    fn step_confirm_quit(&mut self, skip_save: bool) -> Result<State, PromptError> {
        match self.confirm("are you sure you want to quit (y/n): ") {
            Ok(false) => Ok(State::Running),
            Ok(true) if skip_save => Ok(State::Terminated),
            Ok(true) if self.dirty => Ok(State::ConfirmSaveOnQuit),
            Ok(true) => Ok(State::Terminated),
            // Ctrl-C aborts only this question: the quit attempt is off.
            Err(PromptError::Interrupted) => {
                println!();
                Ok(State::Running)
            }
            // A closed stdin cannot answer anything; stop instead of spinning.
            Err(PromptError::Eof) => Ok(State::Terminated),
            Err(e) => Err(e),
        }
    }

    fn step_confirm_save(&mut self) -> Result<State, PromptError> {
        match self.confirm("save changes before quitting (y/n): ") {
            Ok(true) => match self.db.save() {
                Ok(()) => {
                    self.dirty = false;
                    println!("saved {}", self.db.path().display());
                    Ok(State::Terminated)
                }
                // The user asked for a save and did not get one: stay in the
                // session with the dirty flag intact.
                Err(e) => {
                    eprintln!("{}", format!("save failed: {e}").red());
                    Ok(State::Running)
                }
            },
            Ok(false) => Ok(State::Terminated),
            Err(PromptError::Interrupted) => {
                println!();
                Ok(State::Running)
            }
            Err(PromptError::Eof) => {
                eprintln!("input closed; exiting without saving");
                Ok(State::Terminated)
            }
            Err(e) => Err(e),
        }
    }

    /// Ask a y/n question until the answer parses. Interrupt and end-of-input
    /// surface as errors for the caller to map onto a state.
    fn confirm(&mut self, question: &str) -> Result<bool, PromptError> {
        loop {
            let answer = self.prompt.line(question)?;
            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => println!("please answer y or n"),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Command dispatch
    // -----------------------------------------------------------------------

    fn dispatch(&mut self, cmd: Command) -> State {
        match cmd {
            Command::Help => self.print_help(),
            Command::Paths => self.print_paths(),
            Command::CheckGpg => self.cmd_check_gpg(),
            Command::Export => self.cmd_export(),
            Command::Backup => self.cmd_backup(),
            Command::Add => self.cmd_add(),
            Command::List => self.cmd_list(),
            Command::Save => self.cmd_save(),
            Command::Import => println!("import is not implemented yet"),
            Command::Qns => return State::ConfirmQuit { skip_save: true },
            Command::Quit => return State::ConfirmQuit { skip_save: false },
            Command::Empty => {}
            Command::Unknown(word) => {
                println!("unknown command: {word} (try help)");
            }
        }
        State::Running
    }

    fn print_help(&self) {
        println!("\nthicket commands:");
        for (cmd, text) in [
            ("help", "show this page"),
            ("paths", "show the directories and files in use"),
            ("check-gpg", "check whether gpg is available"),
            ("export", "drop a gpg-encrypted copy into your downloads folder"),
            ("backup", "copy the database file to its .bak sibling"),
            ("add", "interactively add a task and its tags"),
            ("print/list/ls", "print every task with its tag tree"),
            ("save", "write the database file"),
            ("import", "(not implemented yet)"),
            ("qns", "quit without being asked to save"),
            ("quit/exit", "quit"),
        ] {
            println!("  {cmd:<16}{text}");
        }
        println!();
    }

    fn print_paths(&self) {
        println!("{}", self.paths.data_dir.display());
        println!("{}", self.paths.db_path.display());
        println!("{}", self.paths.downloads_dir.display());
    }

    fn cmd_check_gpg(&self) {
        if gpg::is_available() {
            println!("{}", "GPG is available".green());
        } else {
            println!("{}", "GPG is NOT available".yellow());
        }
    }

    fn cmd_export(&mut self) {
        if self.dirty {
            println!("note: unsaved changes are not part of the export (run save first)");
        }
        match export::run_export(self.db.path(), &self.paths.downloads_dir, &mut self.prompt) {
            Ok(Some(target)) => {
                println!("{}", format!("export written to {}", target.display()).green());
            }
            Ok(None) => {}
            Err(e) => eprintln!("{}", format!("export failed: {e}").red()),
        }
    }

    fn cmd_backup(&self) {
        match self.db.backup() {
            Ok(bak) => println!("backup written to {}", bak.display()),
            Err(e) => eprintln!("{}", format!("backup failed: {e}").red()),
        }
    }

    fn cmd_add(&mut self) {
        match self.read_task() {
            Ok(task) => {
                println!("added task '{}'", task.name);
                self.db.tasks.push(task);
                self.dirty = true;
            }
            // Backing out mid-entry leaves nothing behind.
            Err(PromptError::Interrupted) | Err(PromptError::Eof) => {
                println!("\nadd cancelled");
            }
            Err(e) => eprintln!("{}", format!("input error: {e}").red()),
        }
    }

    fn read_task(&mut self) -> Result<Task, PromptError> {
        let name = self.prompt.line("task name: ")?;
        let name = name.trim().to_string();
        let tags = self.read_children(&name)?;
        Ok(Task::new(name, tags))
    }

    /// One level of the recursive tag entry flow. A blank line closes the
    /// current level and pops back to the parent.
    fn read_children(&mut self, parent: &str) -> Result<Vec<Tag>, PromptError> {
        let mut children = Vec::new();
        loop {
            let line = self
                .prompt
                .line(&format!("tag under '{parent}' (blank to finish): "))?;
            let name = line.trim();
            if name.is_empty() {
                break;
            }
            let grandchildren = self.read_children(name)?;
            children.push(Tag::with_children(name, grandchildren));
        }
        Ok(children)
    }

    fn cmd_list(&self) {
        if self.db.tasks.is_empty() {
            println!("no tasks yet (try add)");
            return;
        }
        for task in &self.db.tasks {
            print!("{}", task.render());
        }
    }

    fn cmd_save(&mut self) {
        match self.db.save() {
            Ok(()) => {
                self.dirty = false;
                println!("saved {}", self.db.path().display());
            }
            // A failed save keeps the dirty flag: the edits still exist.
            Err(e) => eprintln!("{}", format!("save failed: {e}").red()),
        }
    }
}

/// Full interactive entry point: discover paths, open and back up the
/// database, run the loop on a terminal prompt.
pub fn run_interactive(data_dir_override: Option<&Path>) -> Result<(), SessionError> {
    let paths = paths::discover(data_dir_override)?;
    let db = Database::open(&paths.db_path)?;
    let prompt = ReadlinePrompt::new()?;
    println!("{}", "welcome to thicket!".bold());
    println!("type help to see the available commands.");
    Session::new(db, paths, prompt).run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::backup_path;
    use crate::session::prompt::ScriptedPrompt;
    use std::fs;
    use tempfile::TempDir;

    fn test_paths(tmp: &TempDir) -> AppPaths {
        AppPaths {
            data_dir: tmp.path().to_path_buf(),
            db_path: tmp.path().join("tasks.toml"),
            downloads_dir: tmp.path().to_path_buf(),
        }
    }

    fn session_with<I, S>(tmp: &TempDir, answers: I) -> Session<ScriptedPrompt>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths = test_paths(tmp);
        let db = Database::open(&paths.db_path).unwrap();
        Session::new(db, paths, ScriptedPrompt::new(answers))
    }

    #[test]
    fn command_parse_is_case_insensitive_and_aliased() {
        assert_eq!(Command::parse("HELP"), Command::Help);
        assert_eq!(Command::parse("  quit "), Command::Quit);
        assert_eq!(Command::parse("Exit"), Command::Quit);
        assert_eq!(Command::parse("ls"), Command::List);
        assert_eq!(Command::parse("print"), Command::List);
        assert_eq!(Command::parse("LIST"), Command::List);
        assert_eq!(Command::parse("check-GPG"), Command::CheckGpg);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(
            Command::parse("frobnicate"),
            Command::Unknown("frobnicate".into())
        );
    }

    #[test]
    fn fresh_open_is_dirty_from_migration() {
        let tmp = TempDir::new().unwrap();
        let session = session_with(&tmp, Vec::<String>::new());
        assert!(session.dirty());
    }

    #[test]
    fn save_clears_the_dirty_flag() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["save", "quit", "y"]);
        session.run().unwrap();
        assert!(!session.dirty());
    }

    #[test]
    fn clean_quit_never_asks_about_saving() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["save", "quit", "y"]);
        session.run().unwrap();
        assert!(
            !session
                .prompt
                .asked()
                .iter()
                .any(|q| q.contains("save changes"))
        );
    }

    #[test]
    fn dirty_quit_asks_about_saving() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["quit", "y", "n"]);
        session.run().unwrap();
        assert!(
            session
                .prompt
                .asked()
                .iter()
                .any(|q| q.contains("save changes"))
        );
        // Declined: the back-filled document never reached disk.
        assert_eq!(
            fs::read_to_string(tmp.path().join("tasks.toml")).unwrap(),
            ""
        );
    }

    #[test]
    fn add_sets_dirty_and_builds_the_tag_tree() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(
            &tmp,
            [
                "add", "groceries", "milk", "", "work", "urgent", "", "", "", "qns", "y",
            ],
        );
        session.run().unwrap();
        assert!(session.dirty());
        let tasks = &session.database().tasks;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "groceries");
        assert_eq!(
            tasks[0].tags,
            vec![
                Tag::new("milk"),
                Tag::with_children("work", vec![Tag::new("urgent")]),
            ]
        );
    }

    #[test]
    fn qns_exits_without_writing_despite_unsaved_tasks() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["add", "secret-task", "", "qns", "y"]);
        session.run().unwrap();
        assert!(session.dirty());
        let on_disk = fs::read_to_string(tmp.path().join("tasks.toml")).unwrap();
        assert!(!on_disk.contains("secret-task"));
        assert!(
            !session
                .prompt
                .asked()
                .iter()
                .any(|q| q.contains("save changes"))
        );
    }

    #[test]
    fn declining_the_quit_confirmation_returns_to_the_loop() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["quit", "n", "save", "quit", "y"]);
        session.run().unwrap();
        // The loop kept going after "n": the later save ran.
        assert!(!session.dirty());
    }

    #[test]
    fn confirmation_revalidates_garbage_answers() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["save", "quit", "maybe", "YES"]);
        session.run().unwrap();
        let quit_questions = session
            .prompt
            .asked()
            .iter()
            .filter(|q| q.contains("sure you want to quit"))
            .count();
        assert_eq!(quit_questions, 2);
    }

    #[test]
    fn save_on_quit_writes_the_file() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["add", "groceries", "milk", "", "", "quit", "y", "y"]);
        session.run().unwrap();
        assert!(!session.dirty());
        let on_disk = fs::read_to_string(tmp.path().join("tasks.toml")).unwrap();
        assert!(on_disk.contains("groceries"));
        assert!(on_disk.contains("milk"));
    }

    #[test]
    fn cancelled_add_leaves_no_partial_task() {
        let tmp = TempDir::new().unwrap();
        // Script dries up mid-add: the task name prompt reads end-of-input.
        let mut session = session_with(&tmp, ["add"]);
        session.run().unwrap();
        assert!(session.database().tasks.is_empty());
    }

    #[test]
    fn unknown_commands_keep_the_loop_alive() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["frobnicate", "save", "quit", "y"]);
        session.run().unwrap();
        assert!(!session.dirty());
    }

    #[test]
    fn backup_command_copies_the_current_file() {
        let tmp = TempDir::new().unwrap();
        let mut session = session_with(&tmp, ["save", "backup", "quit", "y"]);
        session.run().unwrap();
        let db_path = tmp.path().join("tasks.toml");
        assert_eq!(
            fs::read_to_string(backup_path(&db_path)).unwrap(),
            fs::read_to_string(&db_path).unwrap()
        );
    }
}
