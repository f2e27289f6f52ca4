//! Interactive terminal loop
//!
//! Reads one command per line from stdin and drives the engine. Notices
//! emitted by the engine are printed as they arrive, interleaved with
//! command output.

use crate::error::Result;
use devmatch_core::{
    Gender, LoginCredentials, PendingRequest, RequestId, ReviewDecision, SignupForm,
    SkillRejection, User, MAX_SKILLS,
};
use devmatch_engine::{
    AppEvent, DeleteOutcome, DevMatchApp, DraftField, Key, Notice, NoticeLevel, ReviewOutcome,
    SaveOutcome, SkillOutcome, SwipeOutcome, View,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::debug;

const HELP: &str = "\
Commands:
  login <email> <password>                 Log in
  signup <first> <last> <email> <password> Create an account
  logout                                   End the session
  feed                                     Show the current candidate
  left | right                             Pass on / connect with the candidate
  details                                  Toggle candidate details
  requests                                 List received requests
  accept <id> | decline <id>               Review a request
  connections [term]                       List (and search) connections
  profile                                  Show your profile
  edit                                     Start editing your profile
  set <field> <value>                      Edit first|last|age|gender|photo|about
  skill add|rm <name>                      Edit skills
  save | cancel                            Commit or discard the draft
  delete | confirm                         Delete your account (two steps)
  help                                     Show this help
  quit                                     Exit";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Signup(SignupArgs),
    Logout,
    Feed,
    Left,
    Right,
    Details,
    Requests,
    Review { id: RequestId, decision: ReviewDecision },
    Connections { term: Option<String> },
    Profile,
    Edit,
    Set(DraftField),
    SkillAdd(String),
    SkillRemove(String),
    Save,
    Cancel,
    Delete,
    Confirm,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupArgs {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help')")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid {field}: '{value}'")]
    InvalidValue { field: &'static str, value: String },
}

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> std::result::Result<Option<Command>, CommandError> {
    let line = line.trim();
    let Some((name, rest)) = split_word(line) else {
        return Ok(None);
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match name.to_lowercase().as_str() {
        "login" => match args.as_slice() {
            [email, password] => Command::Login {
                email: (*email).to_string(),
                password: (*password).to_string(),
            },
            _ => return Err(CommandError::Usage("login <email> <password>")),
        },
        "signup" => match args.as_slice() {
            [first, last, email, password] => Command::Signup(SignupArgs {
                first_name: (*first).to_string(),
                last_name: (*last).to_string(),
                email_id: (*email).to_string(),
                password: (*password).to_string(),
            }),
            _ => return Err(CommandError::Usage("signup <first> <last> <email> <password>")),
        },
        "logout" => Command::Logout,
        "feed" => Command::Feed,
        "left" | "pass" => Command::Left,
        "right" | "connect" => Command::Right,
        "details" => Command::Details,
        "requests" => Command::Requests,
        "accept" | "decline" => {
            let [id] = args.as_slice() else {
                return Err(CommandError::Usage("accept|decline <id>"));
            };
            let decision = if name.eq_ignore_ascii_case("accept") {
                ReviewDecision::Accepted
            } else {
                ReviewDecision::Rejected
            };
            Command::Review {
                id: RequestId::new(*id),
                decision,
            }
        }
        "connections" => Command::Connections {
            term: (!rest.is_empty()).then(|| rest.to_string()),
        },
        "profile" => Command::Profile,
        "edit" => Command::Edit,
        "set" => Command::Set(parse_field(rest)?),
        "skill" => match split_word(rest) {
            Some(("add", skill)) if !skill.is_empty() => Command::SkillAdd(skill.to_string()),
            Some(("rm", skill)) if !skill.is_empty() => Command::SkillRemove(skill.to_string()),
            _ => return Err(CommandError::Usage("skill add|rm <name>")),
        },
        "save" => Command::Save,
        "cancel" => Command::Cancel,
        "delete" => Command::Delete,
        "confirm" => Command::Confirm,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

/// Split off the first word, returning it and the trimmed remainder
fn split_word(input: &str) -> Option<(&str, &str)> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => Some((word, rest.trim())),
        None => Some((input, "")),
    }
}

fn parse_field(input: &str) -> std::result::Result<DraftField, CommandError> {
    const USAGE: &str = "set first|last|age|gender|photo|about <value>";

    let Some((field, value)) = split_word(input) else {
        return Err(CommandError::Usage(USAGE));
    };

    let edit = match field.to_lowercase().as_str() {
        "first" => DraftField::FirstName(value.to_string()),
        "last" => DraftField::LastName(value.to_string()),
        "age" => match value {
            "" | "none" => DraftField::Age(None),
            value => DraftField::Age(Some(value.parse().map_err(|_| {
                CommandError::InvalidValue {
                    field: "age",
                    value: value.to_string(),
                }
            })?)),
        },
        "gender" => DraftField::Gender(Gender::parse(value).ok_or_else(|| {
            CommandError::InvalidValue {
                field: "gender",
                value: value.to_string(),
            }
        })?),
        "photo" => DraftField::PhotoUrl(value.to_string()),
        "about" => DraftField::About(value.to_string()),
        _ => return Err(CommandError::Usage(USAGE)),
    };

    Ok(edit)
}

// =============================================================================
// Rendering
// =============================================================================

/// One-line summary of a user, optionally followed by the detail block
pub fn render_user(user: &User, details: bool) -> String {
    let mut out = user.full_name();
    if let Some(age) = user.age {
        out.push_str(&format!(", {age}"));
    }
    if let Some(gender) = user.gender {
        out.push_str(&format!(" ({gender})"));
    }

    if details {
        if !user.about.is_empty() {
            out.push_str(&format!("\n  About: {}", user.about));
        }
        if !user.skills.is_empty() {
            let skills: Vec<&str> = user.skills.iter().collect();
            out.push_str(&format!("\n  Skills: {}", skills.join(", ")));
        }
        if let Some(photo) = user.photo_url.as_deref().filter(|p| !p.is_empty()) {
            out.push_str(&format!("\n  Photo: {photo}"));
        }
    }

    out
}

pub fn render_request(request: &PendingRequest) -> String {
    format!("[{}] {}", request.id, render_user(&request.sender, false))
}

pub fn render_notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "error",
        NoticeLevel::Warning => "warn",
        NoticeLevel::Info => "info",
    };
    format!("[{tag}] {}", notice.message)
}

// =============================================================================
// Loop
// =============================================================================

pub struct Repl {
    app: DevMatchApp,
}

impl Repl {
    pub fn new(app: DevMatchApp) -> Self {
        Self { app }
    }

    /// Run until `quit` or end of input
    pub async fn run(&self) -> Result<()> {
        let mut events = self.app.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("DevMatch. Type 'help' for commands.");
        match self.app.bootstrap().await {
            Ok(Some(user)) => println!("Welcome back, {}", user.first_name),
            Ok(None) => println!("Please login or signup to continue"),
            Err(err) => debug!(error = %err, "Session probe failed"),
        }
        print_pending(&mut events);

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse(&line) {
                        Ok(None) => {}
                        Ok(Some(Command::Quit)) => break,
                        Ok(Some(command)) => self.execute(command).await,
                        Err(err) => println!("{err}"),
                    }
                    print_pending(&mut events);
                }
                event = events.recv() => match event {
                    Ok(event) => print_event(&event),
                    Err(RecvError::Lagged(skipped)) => debug!(skipped, "Notice stream lagged"),
                    Err(RecvError::Closed) => break,
                },
            }
        }

        Ok(())
    }

    async fn execute(&self, command: Command) {
        // Failures have already been reported as notices by the engine
        if let Err(err) = self.dispatch(command).await {
            debug!(error = %err, "Command failed");
        }
    }

    async fn dispatch(&self, command: Command) -> devmatch_core::Result<()> {
        let app = &self.app;

        match command {
            Command::Login { email, password } => {
                let user = app.login(LoginCredentials::new(email, password)).await?;
                println!("Logged in as {}", user.full_name());
                self.show_feed().await?;
            }
            Command::Signup(args) => {
                app.signup(SignupForm {
                    first_name: args.first_name,
                    last_name: args.last_name,
                    email_id: args.email_id,
                    password: args.password,
                })
                .await?;
            }
            Command::Logout => app.logout().await?,
            Command::Feed => {
                app.session().navigate(View::Feed);
                self.show_feed().await?;
            }
            Command::Left => self.swipe(Key::ArrowLeft).await?,
            Command::Right => self.swipe(Key::ArrowRight).await?,
            Command::Details => {
                app.swipe().handle_key(Key::Space).await?;
                self.print_current();
            }
            Command::Requests => {
                app.session().navigate(View::Requests);
                app.inbox().list().await?;
                let requests = app.inbox().requests();
                if requests.is_empty() {
                    println!("No pending requests");
                }
                for request in &requests {
                    println!("{}", render_request(request));
                }
            }
            Command::Review { id, decision } => {
                match app.inbox().review(&id, decision).await? {
                    ReviewOutcome::NotFound => println!("No pending request with id {id}"),
                    ReviewOutcome::AlreadyPending => println!("Request {id} is already being reviewed"),
                    ReviewOutcome::Reviewed | ReviewOutcome::Discarded => {}
                }
            }
            Command::Connections { term } => {
                app.session().navigate(View::Connections);
                app.connections().refresh().await?;
                let found = app.connections().search(term.as_deref().unwrap_or(""));
                if found.is_empty() {
                    println!("No connections found");
                }
                for user in &found {
                    println!("{}", render_user(user, false));
                }
            }
            Command::Profile => {
                app.session().navigate(View::Profile);
                let user = app.context().require_user()?;
                println!("{}", render_user(&user, true));
                if let Some(draft) = app.profile().draft() {
                    println!("Editing draft: {} {}", draft.first_name, draft.last_name);
                    for (field, message) in app.profile().errors().iter() {
                        println!("  {field}: {message}");
                    }
                }
            }
            Command::Edit => {
                app.profile().enter_edit()?;
                println!("Editing profile. Use 'set', 'skill', then 'save' or 'cancel'");
            }
            Command::Set(edit) => app.profile().update_field(edit)?,
            Command::SkillAdd(skill) => {
                if let SkillOutcome::Rejected(SkillRejection::CapReached) =
                    app.profile().add_skill(&skill)?
                {
                    println!("Skill not added: at most {MAX_SKILLS} skills");
                }
            }
            Command::SkillRemove(skill) => {
                if app.profile().remove_skill(&skill)? == SkillOutcome::NotFound {
                    println!("No skill named '{skill}'");
                }
            }
            Command::Save => {
                if app.profile().save().await? == SaveOutcome::AlreadyPending {
                    println!("A save is already in progress");
                }
            }
            Command::Cancel => {
                app.profile().cancel_edit();
                app.profile().abort_delete();
            }
            Command::Delete => {
                app.profile().request_delete()?;
                println!("Type 'confirm' to delete your account permanently, or 'cancel'");
            }
            Command::Confirm => match app.confirm_delete_account().await? {
                DeleteOutcome::NotRequested => println!("Type 'delete' first"),
                DeleteOutcome::AlreadyPending => println!("Deletion already in progress"),
                DeleteOutcome::Deleted => {}
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }

        Ok(())
    }

    async fn swipe(&self, key: Key) -> devmatch_core::Result<()> {
        match self.app.swipe().handle_key(key).await? {
            Some(SwipeOutcome::Sent | SwipeOutcome::Ignored) => self.print_current(),
            Some(SwipeOutcome::Discarded) | None => println!("Nothing to swipe on right now"),
        }
        Ok(())
    }

    async fn show_feed(&self) -> devmatch_core::Result<()> {
        self.app.swipe().mount().await?;
        self.print_current();
        Ok(())
    }

    fn print_current(&self) {
        let swipe = self.app.swipe();
        match swipe.current() {
            Some(user) => println!(
                "{} ({} in queue)",
                render_user(&user, swipe.show_details()),
                swipe.queue_len()
            ),
            None if swipe.is_fetching() => println!("Loading more profiles..."),
            None => println!("No more profiles. Check back later."),
        }
    }
}

/// Print everything already queued on the event stream
fn print_pending(events: &mut broadcast::Receiver<AppEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => print_event(&event),
            Err(TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
}

fn print_event(event: &AppEvent) {
    match event {
        AppEvent::Notice(notice) => println!("{}", render_notice(notice)),
        AppEvent::Navigated { view } => debug!(view = view.as_str(), "Navigated"),
        other => debug!(?other, "Engine event"),
    }
}
