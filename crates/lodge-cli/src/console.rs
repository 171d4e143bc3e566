//! Interactive record console
//!
//! Single-state loop: print the prompt, read a line, dispatch, print,
//! repeat. All domain errors are recovered here and converted to the fixed
//! console messages; nothing propagates to process exit.

use std::io::{self, BufRead, Write};

use tracing::error;

use lodge_core::commands::{apply, Command, Outcome};
use lodge_core::errors::LodgeError;
use lodge_core::model::ModelKind;
use lodge_core::ops::Store;
use lodge_store::FileStore;

use crate::parse::{parse_method_call, split_args};

const PROMPT: &str = "(lodge) ";

const MSG_CLASS_MISSING: &str = "** class name missing **";
const MSG_ID_MISSING: &str = "** instance id missing **";
const MSG_FIELD_MISSING: &str = "** attribute name missing **";
const MSG_VALUE_MISSING: &str = "** value missing **";
const MSG_NO_CLASS: &str = "** class doesn't exist **";
const MSG_NO_INSTANCE: &str = "** no instance found **";
const MSG_INVALID_METHOD: &str = "** invalid method **";
const MSG_INVALID_SYNTAX: &str = "** invalid syntax **";

/// The console shell
///
/// Owns the in-memory store for the session and flushes it through the file
/// store after every mutating command. Output is written to a generic
/// writer so tests can capture exactly what the user would see.
pub struct Console<W: Write> {
    store: Store,
    files: FileStore,
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(store: Store, files: FileStore, out: W) -> Self {
        Self { store, files, out }
    }

    /// Run the read/dispatch/print loop until `quit` or end-of-input
    pub fn run(&mut self, mut input: impl BufRead) -> io::Result<()> {
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // end-of-input
                return Ok(());
            }
            if !self.handle_line(&line)? {
                return Ok(());
            }
        }
    }

    /// Dispatch one input line; returns false when the session should end
    ///
    /// Known command words always win; the `<Class>.method(args)` sugar is
    /// only tried for lines that don't start with one.
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }

        let args = split_args(line);
        match args[0].as_str() {
            "quit" => return Ok(false),
            "create" => self.cmd_create(&args[1..])?,
            "show" => self.cmd_show(&args[1..])?,
            "destroy" => self.cmd_destroy(&args[1..])?,
            "all" => self.cmd_all(&args[1..])?,
            "update" => self.cmd_update(&args[1..])?,
            "models" => self.cmd_models()?,
            "help" => self.cmd_help()?,
            _ if line.contains('.') && line.ends_with(')') => {
                self.handle_method_call(line)?
            }
            _ => writeln!(self.out, "*** Unknown syntax: {}", line)?,
        }
        Ok(true)
    }

    fn cmd_create(&mut self, args: &[String]) -> io::Result<()> {
        if args.is_empty() {
            writeln!(self.out, "{}", MSG_CLASS_MISSING)
        } else if !ModelKind::is_registered(&args[0]) {
            writeln!(self.out, "{}", MSG_NO_CLASS)
        } else if args.len() == 1 {
            self.dispatch(Command::Create {
                class_name: args[0].clone(),
            })
        } else {
            writeln!(self.out, "** Too many arguments for create **")
        }
    }

    fn cmd_show(&mut self, args: &[String]) -> io::Result<()> {
        match args.len() {
            0 => writeln!(self.out, "{}", MSG_CLASS_MISSING),
            1 => writeln!(self.out, "{}", MSG_ID_MISSING),
            2 => self.dispatch(Command::Show {
                class_name: args[0].clone(),
                id: args[1].clone(),
            }),
            _ => writeln!(self.out, "** Too many arguments for show **"),
        }
    }

    fn cmd_destroy(&mut self, args: &[String]) -> io::Result<()> {
        match args.len() {
            0 => writeln!(self.out, "{}", MSG_CLASS_MISSING),
            1 => writeln!(self.out, "{}", MSG_ID_MISSING),
            2 => self.dispatch(Command::Destroy {
                class_name: args[0].clone(),
                id: args[1].clone(),
            }),
            _ => writeln!(self.out, "** Too many arguments for destroy **"),
        }
    }

    fn cmd_all(&mut self, args: &[String]) -> io::Result<()> {
        if args.len() > 1 {
            return writeln!(self.out, "** Too many arguments for all **");
        }
        self.dispatch(Command::All {
            class_name: args.first().cloned(),
        })
    }

    fn cmd_update(&mut self, args: &[String]) -> io::Result<()> {
        // Arguments past the value are ignored
        match args.len() {
            0 => writeln!(self.out, "{}", MSG_CLASS_MISSING),
            1 => writeln!(self.out, "{}", MSG_ID_MISSING),
            2 => writeln!(self.out, "{}", MSG_FIELD_MISSING),
            3 => writeln!(self.out, "{}", MSG_VALUE_MISSING),
            _ => self.dispatch(Command::Update {
                class_name: args[0].clone(),
                id: args[1].clone(),
                field: args[2].clone(),
                value: args[3].clone(),
            }),
        }
    }

    fn cmd_models(&mut self) -> io::Result<()> {
        let names: Vec<&str> = ModelKind::ALL.iter().map(|k| k.as_str()).collect();
        writeln!(self.out, "{}", names.join(" "))
    }

    fn cmd_help(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "Commands: create <Class> | show <Class> <id> | destroy <Class> <id> | \
             all [<Class>] | update <Class> <id> <field> <value> | models | \
             <Class>.all() | <Class>.count() | quit"
        )
    }

    /// Handle the `<Class>.method(args)` sugar form
    ///
    /// The class is resolved against the registry first, then the method
    /// against the fixed CRUD set; the call re-dispatches through the same
    /// positional validation as the plain commands.
    fn handle_method_call(&mut self, line: &str) -> io::Result<()> {
        let class_name = &line[..line.find('.').unwrap_or(0)];
        if !ModelKind::is_registered(class_name) {
            return writeln!(self.out, "{}", MSG_NO_CLASS);
        }
        let Some(call) = parse_method_call(line) else {
            return writeln!(self.out, "{}", MSG_INVALID_SYNTAX);
        };

        let mut args = vec![call.class_name];
        args.extend(call.args);
        match call.method.as_str() {
            "all" => self.cmd_all(&args),
            "count" => self.dispatch(Command::Count {
                class_name: args[0].clone(),
            }),
            "show" => self.cmd_show(&args),
            "destroy" => self.cmd_destroy(&args),
            "create" => self.cmd_create(&args),
            "update" => self.cmd_update(&args),
            _ => writeln!(self.out, "{}", MSG_INVALID_METHOD),
        }
    }

    /// Apply a command, print its outcome, and flush after mutations
    fn dispatch(&mut self, command: Command) -> io::Result<()> {
        let mutating = command.is_mutating();
        match apply(&mut self.store, command) {
            Ok(outcome) => {
                match outcome {
                    Outcome::Created { id } => writeln!(self.out, "{}", id)?,
                    Outcome::Shown { rendered } => writeln!(self.out, "{}", rendered)?,
                    Outcome::Listing { rendered } => {
                        let quoted: Vec<String> =
                            rendered.iter().map(|r| format!("\"{}\"", r)).collect();
                        writeln!(self.out, "[{}]", quoted.join(", "))?;
                    }
                    Outcome::Counted { count } => writeln!(self.out, "{}", count)?,
                    Outcome::Destroyed | Outcome::Updated => {}
                }
                if mutating {
                    if let Err(err) = self.files.save(&self.store) {
                        error!(error = %err, "failed to persist store");
                    }
                }
                Ok(())
            }
            Err(err) => self.print_error(&err),
        }
    }

    fn print_error(&mut self, err: &LodgeError) -> io::Result<()> {
        let message = match err {
            LodgeError::ModelNotFound { .. } => MSG_NO_CLASS,
            LodgeError::InstanceNotFound { .. } => MSG_NO_INSTANCE,
            // Persistence kinds never escape apply(); keep the match total
            _ => MSG_INVALID_SYNTAX,
        };
        writeln!(self.out, "{}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        console: Console<Vec<u8>>,
        _dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let files = FileStore::new(dir.path().join("records.json"));
        Fixture {
            console: Console::new(Store::new(), files, Vec::new()),
            _dir: dir,
        }
    }

    impl Fixture {
        /// Feed one line, return the output it produced
        fn line(&mut self, line: &str) -> String {
            self.console.out.clear();
            self.console.handle_line(line).unwrap();
            String::from_utf8(self.console.out.clone()).unwrap()
        }
    }

    #[test]
    fn test_quit_ends_session() {
        let mut fx = fixture();
        assert!(!fx.console.handle_line("quit").unwrap());
    }

    #[test]
    fn test_empty_line_does_nothing() {
        let mut fx = fixture();
        assert_eq!(fx.line(""), "");
        assert_eq!(fx.line("   "), "");
    }

    #[test]
    fn test_create_prints_generated_id() {
        let mut fx = fixture();
        let id = fx.line("create User").trim().to_string();
        assert!(!id.is_empty());
        assert!(fx.line(&format!("show User {}", id))
            .starts_with(&format!("[User] ({})", id)));
    }

    #[test]
    fn test_create_missing_and_unknown_class() {
        let mut fx = fixture();
        assert_eq!(fx.line("create"), "** class name missing **\n");
        assert_eq!(fx.line("create Spaceship"), "** class doesn't exist **\n");
        assert_eq!(
            fx.line("create User extra"),
            "** Too many arguments for create **\n"
        );
    }

    #[test]
    fn test_show_positional_validation() {
        let mut fx = fixture();
        assert_eq!(fx.line("show"), "** class name missing **\n");
        assert_eq!(fx.line("show User"), "** instance id missing **\n");
        assert_eq!(fx.line("show Spaceship some-id"), "** class doesn't exist **\n");
        assert_eq!(fx.line("show User no-such-id"), "** no instance found **\n");
    }

    #[test]
    fn test_destroy_then_show_reports_no_instance() {
        let mut fx = fixture();
        let id = fx.line("create User").trim().to_string();
        assert_eq!(fx.line(&format!("destroy User {}", id)), "");
        assert_eq!(
            fx.line(&format!("show User {}", id)),
            "** no instance found **\n"
        );
    }

    #[test]
    fn test_all_listing_formats() {
        let mut fx = fixture();
        assert_eq!(fx.line("all"), "[]\n");

        let id = fx.line("create State").trim().to_string();
        let listing = fx.line("all State");
        assert!(listing.starts_with("[\"[State] ("));
        assert!(listing.contains(&id));

        assert_eq!(fx.line("all Spaceship"), "** class doesn't exist **\n");
        assert_eq!(
            fx.line("all State extra"),
            "** Too many arguments for all **\n"
        );
    }

    #[test]
    fn test_update_positional_validation() {
        let mut fx = fixture();
        assert_eq!(fx.line("update"), "** class name missing **\n");
        assert_eq!(fx.line("update User"), "** instance id missing **\n");
        assert_eq!(fx.line("update User u-1"), "** attribute name missing **\n");
        assert_eq!(fx.line("update User u-1 email"), "** value missing **\n");
        assert_eq!(
            fx.line("update User u-1 email a@b.c"),
            "** no instance found **\n"
        );
    }

    #[test]
    fn test_update_with_quoted_value() {
        let mut fx = fixture();
        let id = fx.line("create Place").trim().to_string();
        assert_eq!(
            fx.line(&format!("update Place {} name \"My Little House\"", id)),
            ""
        );
        let shown = fx.line(&format!("show Place {}", id));
        assert!(shown.contains("'name': 'My Little House'"));
    }

    #[test]
    fn test_update_ignores_extra_arguments() {
        let mut fx = fixture();
        let id = fx.line("create User").trim().to_string();
        assert_eq!(
            fx.line(&format!("update User {} email a@b.c stray stuff", id)),
            ""
        );
        let shown = fx.line(&format!("show User {}", id));
        assert!(shown.contains("'email': 'a@b.c'"));
        assert!(!shown.contains("stray"));
    }

    #[test]
    fn test_method_call_all_and_count() {
        let mut fx = fixture();
        fx.line("create City");
        fx.line("create City");

        assert_eq!(fx.line("City.count()"), "2\n");
        assert_eq!(fx.line("User.count()"), "0\n");
        let listing = fx.line("City.all()");
        assert!(listing.starts_with("[\"[City] ("));
    }

    #[test]
    fn test_method_call_show_and_destroy() {
        let mut fx = fixture();
        let id = fx.line("Review.create()").trim().to_string();
        assert!(!id.is_empty());

        let shown = fx.line(&format!("Review.show(\"{}\")", id));
        assert!(shown.starts_with(&format!("[Review] ({})", id)));

        assert_eq!(fx.line(&format!("Review.destroy(\"{}\")", id)), "");
        assert_eq!(
            fx.line(&format!("Review.show(\"{}\")", id)),
            "** no instance found **\n"
        );
    }

    #[test]
    fn test_method_call_missing_arguments_use_positional_messages() {
        let mut fx = fixture();
        assert_eq!(fx.line("User.show()"), "** instance id missing **\n");
        assert_eq!(fx.line("User.destroy()"), "** instance id missing **\n");
        assert_eq!(
            fx.line("User.update(\"u-1\")"),
            "** attribute name missing **\n"
        );
        assert_eq!(
            fx.line("User.update(\"u-1\", \"email\")"),
            "** value missing **\n"
        );
    }

    #[test]
    fn test_method_call_update_applies() {
        let mut fx = fixture();
        let id = fx.line("create User").trim().to_string();
        assert_eq!(
            fx.line(&format!("User.update(\"{}\", \"first_name\", \"Betty\")", id)),
            ""
        );
        let shown = fx.line(&format!("show User {}", id));
        assert!(shown.contains("'first_name': 'Betty'"));
    }

    #[test]
    fn test_plain_command_wins_over_dotted_heuristic() {
        // A value that happens to contain a dot and end in a parenthesis
        // must not reroute a well-formed plain command
        let mut fx = fixture();
        let id = fx.line("create User").trim().to_string();
        assert_eq!(fx.line(&format!("update User {} email a@b.c)", id)), "");
        let shown = fx.line(&format!("show User {}", id));
        assert!(shown.contains("'email': 'a@b.c)'"));
    }

    #[test]
    fn test_method_call_empty_id_reaches_the_store() {
        let mut fx = fixture();
        assert_eq!(fx.line("User.show(\"\")"), "** no instance found **\n");
        assert_eq!(fx.line("User.destroy(\"\")"), "** no instance found **\n");
    }

    #[test]
    fn test_method_call_rejections() {
        let mut fx = fixture();
        assert_eq!(fx.line("Spaceship.all()"), "** class doesn't exist **\n");
        assert_eq!(fx.line("User.launch()"), "** invalid method **\n");
        assert_eq!(fx.line("User.all(junk))"), "** invalid syntax **\n");
    }

    #[test]
    fn test_unknown_command() {
        let mut fx = fixture();
        assert_eq!(fx.line("frobnicate"), "*** Unknown syntax: frobnicate\n");
    }

    #[test]
    fn test_models_lists_registry() {
        let mut fx = fixture();
        let listed = fx.line("models");
        for kind in ModelKind::ALL {
            assert!(listed.contains(kind.as_str()));
        }
    }

    #[test]
    fn test_mutations_flush_to_file() {
        let mut fx = fixture();
        let id = fx.line("create Amenity").trim().to_string();

        let reloaded = fx.console.files.load();
        assert!(reloaded.find_by_id("Amenity", &id).is_ok());

        fx.line(&format!("destroy Amenity {}", id));
        assert!(fx.console.files.load().is_empty());
    }

    #[test]
    fn test_run_stops_at_end_of_input() {
        let dir = TempDir::new().unwrap();
        let files = FileStore::new(dir.path().join("records.json"));
        let mut console = Console::new(Store::new(), files, Vec::new());

        let input: &[u8] = b"create User\n";
        console.run(input).unwrap();

        let output = String::from_utf8(console.out.clone()).unwrap();
        // Prompt, id line, prompt again before EOF
        assert!(output.starts_with(PROMPT));
        assert!(output.ends_with(PROMPT));
    }
}
