//! Line-oriented terminal front end
//!
//! Reads one command per line from stdin, routes it to the view model of
//! the current page and prints the result. Toasts queue up until read with
//! `toasts`.

use chrono::{Datelike, NaiveDate, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tutorhub_core::calendar::CalendarMonth;
use tutorhub_core::models::format_time_of_day;
use tutorhub_core::{BookingRequest, DayOfWeek, Page, Post};

use crate::state::AppState;
use crate::viewmodel::{
    ActionError, AuthViewModel, BookingViewModel, CommunityViewModel, DashboardTab,
    FeedbackViewModel, LibraryViewModel, MatchingViewModel, Navigation, ProfileViewModel,
    ReportsViewModel, Screen, SessionRecordViewModel, TutorDashboardViewModel,
};

const HELP: &str = "\
login <email> <password>     log in
logout                       end the session
pages                        list pages for your role
open <page>                  open a page (see `pages`)
slots                        list bookable slots
select <slot id>             choose a slot to book
notes <text>                 notes for the tutor
book                         send the booking request
calendar [YYYY-MM]           month view of open slots and bookings
schedule                     your weekly availability
add <day> <start> <end>      add availability, e.g. `add wed 14:00 16:00`
edit day|start|end <value>   change the availability dialog after a failure
retry                        submit the availability dialog again
cancel                       close the availability dialog
remove <entry id>            delete availability
requests                     incoming booking requests
confirm <id> / reject <id>   decide a pending request
sessions                     community class sessions
session <id>                 switch class session
post <title> | <content>     start a discussion
comment <post id> <text>     reply to a post
search <query>               search the library
rate <session id> <1-5> [comment]
assign <student id> <tutor id>
record <session id> <yes|no> [notes]
profile name|phone|bio <text> edit your profile (on the profile page)
save                         save the profile form
toasts                       show notifications
help                         this text
quit                         exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Logout,
    Pages,
    Open(Page),
    Slots,
    Select(i64),
    Notes(String),
    Book,
    Calendar(Option<(i32, u32)>),
    Schedule,
    Add {
        day: DayOfWeek,
        start: String,
        end: String,
    },
    Edit(DialogEdit),
    Retry,
    Cancel,
    Remove(i64),
    Requests,
    Confirm(i64),
    Reject(i64),
    Sessions,
    Session(i64),
    Post { title: String, content: String },
    Comment { post_id: i64, content: String },
    Search(String),
    Rate {
        record_id: u32,
        rating: u8,
        comment: String,
    },
    Assign { student_id: u32, tutor_id: u32 },
    Record {
        record_id: u32,
        attended: bool,
        notes: String,
    },
    Profile { field: ProfileField, value: String },
    Save,
    Toasts,
    Help,
    Quit,
}

/// Change to one field of the availability dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEdit {
    Day(DayOfWeek),
    Start(String),
    End(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Phone,
    Bio,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown page: {0}")]
    UnknownPage(String),
}

fn parse_id<T: std::str::FromStr>(arg: Option<&str>, usage: &'static str) -> Result<T, ParseError> {
    arg.and_then(|a| a.parse().ok()).ok_or(ParseError::Usage(usage))
}

/// Day as a number (Sunday = 0) or a name prefix such as `wed`
fn parse_day(arg: &str) -> Option<DayOfWeek> {
    if let Ok(index) = arg.parse::<i64>() {
        return DayOfWeek::from_index(index);
    }
    let arg = arg.to_lowercase();
    if arg.len() < 2 {
        return None;
    }
    DayOfWeek::DISPLAY_ORDER
        .iter()
        .copied()
        .find(|d| d.display_name().to_lowercase().starts_with(&arg))
}

fn parse_month(arg: &str) -> Option<(i32, u32)> {
    let (year, month) = arg.split_once('-')?;
    let year = year.parse().ok()?;
    let month = month.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

impl Command {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match name.to_lowercase().as_str() {
            "" => return Ok(None),
            "login" => match (args.next(), args.next()) {
                (Some(email), Some(password)) => Command::Login {
                    email: email.to_string(),
                    password: password.to_string(),
                },
                _ => return Err(ParseError::Usage("login <email> <password>")),
            },
            "logout" => Command::Logout,
            "pages" => Command::Pages,
            "open" => {
                let slug = args.next().ok_or(ParseError::Usage("open <page>"))?;
                let page =
                    Page::from_slug(slug).ok_or_else(|| ParseError::UnknownPage(slug.to_string()))?;
                Command::Open(page)
            }
            "slots" => Command::Slots,
            "select" => Command::Select(parse_id(args.next(), "select <slot id>")?),
            "notes" => Command::Notes(rest.to_string()),
            "book" => Command::Book,
            "calendar" => match args.next() {
                None => Command::Calendar(None),
                Some(arg) => Command::Calendar(Some(
                    parse_month(arg).ok_or(ParseError::Usage("calendar [YYYY-MM]"))?,
                )),
            },
            "schedule" => Command::Schedule,
            "add" => {
                const USAGE: &str = "add <day> <HH:MM> <HH:MM>";
                let day = args.next().and_then(parse_day).ok_or(ParseError::Usage(USAGE))?;
                match (args.next(), args.next()) {
                    (Some(start), Some(end)) => Command::Add {
                        day,
                        start: start.to_string(),
                        end: end.to_string(),
                    },
                    _ => return Err(ParseError::Usage(USAGE)),
                }
            }
            "edit" => {
                const USAGE: &str = "edit day|start|end <value>";
                let edit = match (args.next().map(str::to_lowercase).as_deref(), args.next()) {
                    (Some("day"), Some(value)) => {
                        DialogEdit::Day(parse_day(value).ok_or(ParseError::Usage(USAGE))?)
                    }
                    (Some("start"), Some(value)) => DialogEdit::Start(value.to_string()),
                    (Some("end"), Some(value)) => DialogEdit::End(value.to_string()),
                    _ => return Err(ParseError::Usage(USAGE)),
                };
                Command::Edit(edit)
            }
            "retry" => Command::Retry,
            "cancel" => Command::Cancel,
            "remove" => Command::Remove(parse_id(args.next(), "remove <entry id>")?),
            "requests" => Command::Requests,
            "confirm" => Command::Confirm(parse_id(args.next(), "confirm <request id>")?),
            "reject" => Command::Reject(parse_id(args.next(), "reject <request id>")?),
            "sessions" => Command::Sessions,
            "session" => Command::Session(parse_id(args.next(), "session <session id>")?),
            "post" => {
                // Emptiness is checked by the page so it can warn
                let (title, content) = rest.split_once('|').unwrap_or((rest, ""));
                Command::Post {
                    title: title.trim().to_string(),
                    content: content.trim().to_string(),
                }
            }
            "comment" => {
                let post_id = parse_id(args.next(), "comment <post id> <text>")?;
                let content = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, text)| text.trim().to_string())
                    .unwrap_or_default();
                Command::Comment { post_id, content }
            }
            "search" => Command::Search(rest.to_string()),
            "rate" => {
                const USAGE: &str = "rate <session id> <1-5> [comment]";
                let record_id = parse_id(args.next(), USAGE)?;
                let rating = parse_id(args.next(), USAGE)?;
                Command::Rate {
                    record_id,
                    rating,
                    comment: args.collect::<Vec<_>>().join(" "),
                }
            }
            "assign" => {
                const USAGE: &str = "assign <student id> <tutor id>";
                Command::Assign {
                    student_id: parse_id(args.next(), USAGE)?,
                    tutor_id: parse_id(args.next(), USAGE)?,
                }
            }
            "record" => {
                const USAGE: &str = "record <session id> <yes|no> [notes]";
                let record_id = parse_id(args.next(), USAGE)?;
                let attended = match args.next().map(str::to_lowercase).as_deref() {
                    Some("yes" | "y") => true,
                    Some("no" | "n") => false,
                    _ => return Err(ParseError::Usage(USAGE)),
                };
                Command::Record {
                    record_id,
                    attended,
                    notes: args.collect::<Vec<_>>().join(" "),
                }
            }
            "profile" => {
                let field = match args.next().map(str::to_lowercase).as_deref() {
                    Some("name") => ProfileField::Name,
                    Some("phone") => ProfileField::Phone,
                    Some("bio") => ProfileField::Bio,
                    _ => return Err(ParseError::Usage("profile name|phone|bio <text>")),
                };
                // Empty values are allowed; the page checks what is required
                let value = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, text)| text.trim().to_string())
                    .unwrap_or_default();
                Command::Profile { field, value }
            }
            "save" => Command::Save,
            "toasts" => Command::Toasts,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// All page view models behind the console
pub struct Console {
    state: AppState,
    auth: AuthViewModel,
    nav: Navigation,
    booking: BookingViewModel,
    dashboard: TutorDashboardViewModel,
    community: CommunityViewModel,
    profile: ProfileViewModel,
    feedback: FeedbackViewModel,
    library: LibraryViewModel,
    reports: ReportsViewModel,
    matching: MatchingViewModel,
    records: SessionRecordViewModel,
}

type Lines = Vec<String>;

const NO_DIALOG: &str = "No availability dialog open (start one with `add`)";

impl Console {
    pub fn new(state: AppState) -> Self {
        Self {
            auth: AuthViewModel::new(state.clone()),
            nav: Navigation::new(state.session.clone()),
            booking: BookingViewModel::new(state.clone()),
            dashboard: TutorDashboardViewModel::new(state.clone()),
            community: CommunityViewModel::new(state.clone()),
            profile: ProfileViewModel::new(state.clone()),
            feedback: FeedbackViewModel::new(state.clone()),
            library: LibraryViewModel::new(),
            reports: ReportsViewModel::new(state.clone()),
            matching: MatchingViewModel::new(state.clone()),
            records: SessionRecordViewModel::new(state.clone()),
            state,
        }
    }

    /// Resolve the starting screen and describe it
    pub async fn start(&self) -> Lines {
        let screen = self.auth.bootstrap().await;
        self.show_screen(screen).await
    }

    /// Run one command; failures come back as output lines
    pub async fn execute(&self, command: Command) -> Lines {
        debug!(?command, "Console command");
        match self.dispatch(command).await {
            Ok(lines) => lines,
            Err(e) => vec![format!("! {}", e)],
        }
    }

    async fn dispatch(&self, command: Command) -> Result<Lines, ActionError> {
        match command {
            Command::Login { email, password } => {
                if self.state.session.is_logged_in() {
                    let current = self.state.session.email().unwrap_or_default();
                    return Ok(vec![format!("Already logged in as {} (logout first)", current)]);
                }
                let screen = self.auth.login(&email, &password).await;
                if screen == Screen::Login {
                    let reason = self.auth.auth_error().unwrap_or_default();
                    return Ok(vec![format!("Login failed: {}", reason)]);
                }
                Ok(self.show_screen(screen).await)
            }
            Command::Logout => {
                let screen = self.auth.logout().await;
                self.nav.reset();
                Ok(self.show_screen(screen).await)
            }
            Command::Pages => self.pages(),
            Command::Open(page) => {
                let page = self.nav.navigate(page)?;
                self.open(page).await
            }
            Command::Slots => {
                self.booking.load().await?;
                Ok(self.slot_lines())
            }
            Command::Select(id) => {
                self.ensure_loaded().await?;
                if self.booking.select_slot(id) {
                    Ok(vec![format!("Selected slot #{}", id)])
                } else {
                    Ok(vec![format!("Slot #{} is not available", id)])
                }
            }
            Command::Notes(text) => {
                self.booking.set_notes(text);
                Ok(vec!["Notes saved".to_string()])
            }
            Command::Book => {
                let booking = self.booking.submit().await?;
                Ok(vec![booking_line(&booking)])
            }
            Command::Calendar(month) => {
                self.booking.load().await?;
                let today = Utc::now().date_naive();
                let (year, month) = month.unwrap_or((today.year(), today.month()));
                let grid = self
                    .booking
                    .calendar_month(year, month)
                    .ok_or(ActionError::NotFound)?;
                Ok(calendar_lines(&grid))
            }
            Command::Schedule => {
                self.dashboard.select_tab(DashboardTab::Schedule);
                let mut lines = vec![format!(
                    "Weekly availability: {} window(s)",
                    self.dashboard.schedule().len()
                )];
                lines.extend(self.schedule_lines());
                Ok(lines)
            }
            Command::Add { day, start, end } => {
                // Starts over, replacing whatever a failed attempt left behind
                self.dashboard.open_dialog();
                self.dashboard.set_day(day);
                self.dashboard.set_start(start);
                self.dashboard.set_end(end);
                Ok(self.submit_schedule().await)
            }
            Command::Edit(edit) => {
                if !self.dashboard.dialog().open {
                    return Ok(vec![NO_DIALOG.to_string()]);
                }
                match edit {
                    DialogEdit::Day(day) => self.dashboard.set_day(day),
                    DialogEdit::Start(value) => self.dashboard.set_start(value),
                    DialogEdit::End(value) => self.dashboard.set_end(value),
                }
                Ok(self.dialog_lines())
            }
            Command::Retry => {
                if !self.dashboard.dialog().open {
                    return Ok(vec![NO_DIALOG.to_string()]);
                }
                Ok(self.submit_schedule().await)
            }
            Command::Cancel => {
                self.dashboard.close_dialog();
                Ok(vec!["Dialog closed".to_string()])
            }
            Command::Remove(id) => {
                self.dashboard.delete_entry(id).await?;
                Ok(self.schedule_lines())
            }
            Command::Requests => {
                self.dashboard.select_tab(DashboardTab::Requests);
                Ok(self.request_lines())
            }
            Command::Confirm(id) => {
                let updated = self.dashboard.confirm(id).await?;
                Ok(vec![booking_line(&updated)])
            }
            Command::Reject(id) => {
                let updated = self.dashboard.reject(id).await?;
                Ok(vec![booking_line(&updated)])
            }
            Command::Sessions => {
                self.community.load().await?;
                Ok(self.session_lines())
            }
            Command::Session(id) => {
                self.community.select_session(id).await?;
                Ok(self.post_lines())
            }
            Command::Post { title, content } => {
                self.community.create_post(&title, &content).await?;
                Ok(self.post_lines())
            }
            Command::Comment { post_id, content } => {
                self.community.set_comment_draft(post_id, content.clone());
                self.community.submit_comment(post_id, &content).await?;
                Ok(self.post_lines())
            }
            Command::Search(query) => Ok(self
                .library
                .search(&query)
                .iter()
                .map(|r| format!("#{} {} ({}, {}) by {}", r.id, r.title, r.kind.display_name(), r.subject, r.author))
                .collect()),
            Command::Rate {
                record_id,
                rating,
                comment,
            } => {
                self.feedback.submit(record_id, rating, &comment)?;
                Ok(vec![format!("Rated session #{} with {}/5", record_id, rating)])
            }
            Command::Assign {
                student_id,
                tutor_id,
            } => {
                self.matching.assign(student_id, tutor_id)?;
                Ok(Vec::new())
            }
            Command::Record {
                record_id,
                attended,
                notes,
            } => {
                let record = self.records.record(record_id, attended, &notes)?;
                Ok(vec![format!(
                    "#{} {} with {}: {}",
                    record.id,
                    record.date,
                    record.student_name,
                    if record.attended { "attended" } else { "missed" }
                )])
            }
            Command::Profile { field, value } => {
                if self.nav.current() != Some(Page::Profile) {
                    return Ok(vec![format!(
                        "Open the profile page first (`open {}`)",
                        Page::Profile.slug()
                    )]);
                }
                let mut form = self.profile.form();
                match field {
                    ProfileField::Name => form.name = value,
                    ProfileField::Phone => form.phone = value,
                    ProfileField::Bio => form.bio = value,
                }
                self.profile.set_form(form);
                Ok(self.profile_form_lines())
            }
            Command::Save => {
                if self.nav.current() != Some(Page::Profile) {
                    return Ok(vec![format!(
                        "Open the profile page first (`open {}`)",
                        Page::Profile.slug()
                    )]);
                }
                let saved = self.profile.save()?;
                Ok(vec![format!("Profile saved for {}", saved.name.trim())])
            }
            Command::Toasts => {
                if self.state.notifier.is_empty() {
                    return Ok(vec!["No notifications".to_string()]);
                }
                let toasts = self.state.notifier.drain();
                Ok(toasts
                    .iter()
                    .map(|t| {
                        format!(
                            "[{}] {} {}",
                            t.level.label(),
                            t.created_at.format("%H:%M:%S"),
                            t.message
                        )
                    })
                    .collect())
            }
            Command::Help => Ok(HELP.lines().map(str::to_string).collect()),
            // Handled by the input loop
            Command::Quit => Ok(Vec::new()),
        }
    }

    async fn show_screen(&self, screen: Screen) -> Lines {
        match screen {
            Screen::Login => vec!["Please log in: login <email> <password>".to_string()],
            Screen::Shell(role) => {
                let home = self.nav.enter_shell(role);
                let name = self
                    .state
                    .session
                    .current_user()
                    .map(|u| u.name)
                    .unwrap_or_default();
                let mut lines = vec![format!("Welcome, {} ({})", name, role.display_name())];
                match self.open(home).await {
                    Ok(page) => lines.extend(page),
                    Err(e) => lines.push(format!("! {}", e)),
                }
                lines
            }
        }
    }

    fn pages(&self) -> Result<Lines, ActionError> {
        let menu = self.nav.menu();
        if menu.is_empty() {
            return Err(ActionError::Unauthenticated);
        }
        Ok(menu
            .iter()
            .map(|item| {
                let marker = if item.active { '>' } else { ' ' };
                format!("{} {:<10} {}", marker, item.page.slug(), item.title)
            })
            .collect())
    }

    async fn open(&self, page: Page) -> Result<Lines, ActionError> {
        info!(page = page.slug(), "Opening page");
        let mut lines = vec![format!("== {} ==", page.title())];
        match page {
            Page::Calendar => {
                self.booking.load().await?;
                lines.extend(self.slot_lines());
                let bookings = self.booking.my_bookings();
                if !bookings.is_empty() {
                    lines.push("My bookings:".to_string());
                    lines.extend(bookings.iter().map(booking_line));
                }
            }
            Page::TutorDashboard => {
                self.dashboard.load().await?;
                match self.dashboard.tab() {
                    DashboardTab::Schedule => {
                        lines.extend(self.schedule_lines());
                        lines.push(format!(
                            "Pending requests: {}",
                            self.dashboard.pending_count()
                        ));
                    }
                    DashboardTab::Requests => lines.extend(self.request_lines()),
                }
                if self.dashboard.dialog().open {
                    lines.extend(self.dialog_lines());
                }
            }
            Page::Community => {
                self.community.load().await?;
                lines.extend(self.session_lines());
                lines.extend(self.post_lines());
            }
            Page::Profile => {
                if let Some(user) = self.profile.user() {
                    lines.push(format!("{} <{}>", user.name, user.email));
                    lines.push(format!("Role: {}", user.role.display_name()));
                    if let Some(faculty) = &user.faculty {
                        lines.push(format!("Faculty: {}", faculty));
                    }
                    if !user.subjects.is_empty() {
                        lines.push(format!("Subjects: {}", user.subjects.join(", ")));
                    }
                }
                self.profile.edit();
                lines.extend(self.profile_form_lines());
            }
            Page::Feedback => {
                lines.extend(self.feedback.sessions().iter().map(|r| {
                    let rating = r
                        .rating
                        .map_or("not rated".to_string(), |n| format!("{}/5", n));
                    format!("#{} {} {} with {} ({})", r.id, r.date, r.subject, r.tutor_name, rating)
                }));
            }
            Page::Library => {
                lines.extend(self.library.resources().iter().map(|r| {
                    format!("#{} {} [{}] {}", r.id, r.title, r.kind.display_name(), r.subject)
                }));
            }
            Page::Reports => {
                let overview = self.reports.overview()?;
                lines.push(format!("Sessions: {}", overview.total_sessions));
                lines.push(format!(
                    "Completion: {:.0}%",
                    overview.completion_rate * 100.0
                ));
                if let Some(avg) = overview.average_rating {
                    lines.push(format!("Average rating: {:.1}", avg));
                }
                lines.extend(overview.by_faculty.iter().map(|f| {
                    format!(
                        "  {:<12} {} sessions, {} attended, {} min",
                        f.faculty, f.sessions, f.attended, f.total_minutes
                    )
                }));
            }
            Page::Matching => {
                for student in self.matching.students()? {
                    lines.push(format!("#{} {} ({})", student.id, student.name, student.subjects.join(", ")));
                    for s in self.matching.suggestions(student.id)? {
                        lines.push(format!("    tutor #{} {} score {:.1}", s.tutor_id, s.tutor_name, s.score));
                    }
                }
            }
            Page::SessionRecord => {
                lines.extend(self.records.sessions().iter().map(|r| {
                    let state = if r.attended { "attended" } else { "missed" };
                    format!("#{} {} {} with {} ({})", r.id, r.date, r.subject, r.student_name, state)
                }));
            }
        }
        Ok(lines)
    }

    /// Submit the availability dialog. A failure leaves it open for `edit`
    /// and `retry`, showing the reason.
    async fn submit_schedule(&self) -> Lines {
        match self.dashboard.submit_dialog().await {
            Ok(entry) => vec![format!(
                "Added #{} {} {}-{}",
                entry.id,
                entry.day_of_week.display_name(),
                format_time_of_day(entry.start_time),
                format_time_of_day(entry.end_time)
            )],
            Err(e) if self.dashboard.dialog().error.is_none() => {
                // Refused before the form was looked at
                self.dashboard.close_dialog();
                vec![format!("! {}", e)]
            }
            Err(_) => self.dialog_lines(),
        }
    }

    fn dialog_lines(&self) -> Lines {
        let dialog = self.dashboard.dialog();
        let form = &dialog.form;
        let mut lines = vec![format!(
            "Add availability: {} {}-{}",
            form.day_of_week.display_name(),
            form.start_time,
            form.end_time
        )];
        if let Some(error) = &dialog.error {
            lines.push(format!("! {}", error));
        }
        lines.push("  (edit day|start|end <value>, retry, cancel)".to_string());
        lines
    }

    fn profile_form_lines(&self) -> Lines {
        let form = self.profile.form();
        vec![
            format!("  name:  {}", form.name),
            format!("  phone: {}", form.phone),
            format!("  bio:   {}", form.bio),
        ]
    }

    async fn ensure_loaded(&self) -> Result<(), ActionError> {
        if !self.booking.is_loaded() {
            self.booking.load().await?;
        }
        Ok(())
    }

    fn slot_lines(&self) -> Lines {
        let slots = self.booking.bookable_slots();
        if slots.is_empty() {
            return vec!["No open slots".to_string()];
        }
        let selected = self.booking.selected_slot();
        slots
            .iter()
            .map(|s| {
                let marker = if selected == Some(s.id) { '*' } else { ' ' };
                format!(
                    "{} #{} {} {} {}",
                    marker,
                    s.id,
                    s.when_label(),
                    s.tutor_name.as_deref().unwrap_or("-"),
                    s.subject.as_deref().unwrap_or("")
                )
            })
            .collect()
    }

    fn schedule_lines(&self) -> Lines {
        let mut lines = Vec::new();
        for (day, entries) in self.dashboard.schedule_by_day() {
            if entries.is_empty() {
                continue;
            }
            let windows: Vec<String> = entries
                .iter()
                .map(|e| {
                    format!(
                        "#{} {}-{}",
                        e.id,
                        format_time_of_day(e.start_time),
                        format_time_of_day(e.end_time)
                    )
                })
                .collect();
            lines.push(format!("{:<10} {}", day.display_name(), windows.join(", ")));
        }
        if lines.is_empty() {
            lines.push("No availability yet".to_string());
        }
        lines
    }

    /// Pending requests first, then the ones already decided
    fn request_lines(&self) -> Lines {
        let pending = self.dashboard.pending_requests();
        let mut lines = vec![format!("Pending: {}", pending.len())];
        lines.extend(pending.iter().map(booking_line));

        let decided: Vec<BookingRequest> = self
            .dashboard
            .requests()
            .into_iter()
            .filter(|r| !r.is_pending())
            .collect();
        if !decided.is_empty() {
            lines.push("Decided:".to_string());
            lines.extend(decided.iter().map(booking_line));
        }
        lines
    }

    fn session_lines(&self) -> Lines {
        let selected = self.community.selected_session();
        self.community
            .sessions()
            .iter()
            .map(|s| {
                let marker = if selected == Some(s.id) { '>' } else { ' ' };
                format!("{} #{} {}", marker, s.id, s.title)
            })
            .collect()
    }

    fn post_lines(&self) -> Lines {
        let mut lines = Vec::new();
        for post in self.community.posts() {
            lines.extend(thread_lines(&post));
            if self.community.is_submitting(post.id) {
                lines.push("    (sending reply...)".to_string());
                continue;
            }
            let draft = self.community.comment_draft(post.id);
            if !draft.is_empty() {
                lines.push(format!("    draft: {}", draft));
            }
        }
        lines
    }
}

fn booking_line(booking: &BookingRequest) -> String {
    let when = match (booking.date, booking.start_time) {
        (Some(date), Some(start)) => format!("{} {}", date, format_time_of_day(start)),
        (None, Some(start)) => format_time_of_day(start),
        _ => booking
            .availability_id
            .map_or_else(String::new, |id| format!("slot #{}", id)),
    };
    let who = booking
        .student_name
        .as_deref()
        .or(booking.tutor_name.as_deref())
        .unwrap_or("-");
    format!("#{} [{}] {} {}", booking.id, booking.status, when, who)
}

fn thread_lines(post: &Post) -> Lines {
    let mut lines = vec![format!(
        "#{} {} by {}",
        post.id,
        post.title,
        post.author_name.as_deref().unwrap_or("anonymous")
    )];
    lines.push(format!("    {}", post.content));
    lines.extend(post.comments.iter().map(|c| {
        format!(
            "    > {}: {}",
            c.author_name.as_deref().unwrap_or("anonymous"),
            c.content
        )
    }));
    lines
}

/// Monday-first grid; `*` marks open slots, `+` own bookings
fn calendar_lines(grid: &CalendarMonth) -> Lines {
    let title = NaiveDate::from_ymd_opt(grid.year, grid.month, 1)
        .map_or_else(String::new, |d| d.format("%B %Y").to_string());
    let mut lines = vec![title];
    lines.push(
        DayOfWeek::DISPLAY_ORDER
            .iter()
            .map(|d| format!("{:<5}", d.short_name()))
            .collect::<String>(),
    );
    for week in &grid.weeks {
        let row: String = week
            .iter()
            .map(|day| {
                if !day.in_month {
                    return "     ".to_string();
                }
                let mark = match (day.slot_ids.is_empty(), day.booking_ids.is_empty()) {
                    (_, false) => '+',
                    (false, true) => '*',
                    (true, true) => ' ',
                };
                format!("{:>2}{}  ", day.date.day(), mark)
            })
            .collect();
        lines.push(row.trim_end().to_string());
    }
    lines
}

/// Read commands from stdin until `quit` or end of input
pub async fn run(state: AppState) -> std::io::Result<()> {
    let console = Console::new(state.clone());
    print_lines(&console.start().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        print_lines(&console.execute(command).await);

        if let Some(latest) = state.notifier.latest() {
            println!(
                "({} notification(s), latest: {}; `toasts` to read)",
                state.notifier.len(),
                latest.message
            );
        }
    }

    info!("Console closed");
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        app_state, class_session, pending_request, post, student, time, tutor, weekly_slot,
        MemoryApi,
    };
    use tutorhub_core::ScheduleEntry;

    fn run(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_eq!(
            Command::parse("login lee@uni.edu secret").unwrap(),
            Some(Command::Login {
                email: "lee@uni.edu".to_string(),
                password: "secret".to_string(),
            })
        );
        assert_eq!(
            Command::parse("open Dashboard").unwrap(),
            Some(Command::Open(Page::TutorDashboard))
        );
        assert_eq!(
            Command::parse("add wed 14:00 16:00").unwrap(),
            Some(Command::Add {
                day: DayOfWeek::Wednesday,
                start: "14:00".to_string(),
                end: "16:00".to_string(),
            })
        );
        assert_eq!(
            Command::parse("add 0 9:00 10:00").unwrap(),
            Some(Command::Add {
                day: DayOfWeek::Sunday,
                start: "9:00".to_string(),
                end: "10:00".to_string(),
            })
        );
        assert_eq!(
            Command::parse("comment 42 Thanks!  see you").unwrap(),
            Some(Command::Comment {
                post_id: 42,
                content: "Thanks!  see you".to_string(),
            })
        );
        assert_eq!(
            Command::parse("post Exam tips | Bring a calculator").unwrap(),
            Some(Command::Post {
                title: "Exam tips".to_string(),
                content: "Bring a calculator".to_string(),
            })
        );
        assert_eq!(
            Command::parse("calendar 2026-10").unwrap(),
            Some(Command::Calendar(Some((2026, 10))))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("dance").unwrap_err(),
            ParseError::Unknown("dance".to_string())
        );
        assert!(matches!(
            Command::parse("select abc").unwrap_err(),
            ParseError::Usage(_)
        ));
        assert!(matches!(
            Command::parse("open nowhere").unwrap_err(),
            ParseError::UnknownPage(_)
        ));
        assert!(matches!(
            Command::parse("add m 9:00 10:00").unwrap_err(),
            ParseError::Usage(_)
        ));
        assert!(matches!(
            Command::parse("calendar 2026-13").unwrap_err(),
            ParseError::Usage(_)
        ));
        assert!(matches!(
            Command::parse("edit lunch 12:00").unwrap_err(),
            ParseError::Usage(_)
        ));
        assert!(matches!(
            Command::parse("profile age 30").unwrap_err(),
            ParseError::Usage(_)
        ));
    }

    #[test]
    fn test_parse_dialog_and_profile_commands() {
        assert_eq!(
            Command::parse("edit end 12:00").unwrap(),
            Some(Command::Edit(DialogEdit::End("12:00".to_string())))
        );
        assert_eq!(
            Command::parse("edit day thu").unwrap(),
            Some(Command::Edit(DialogEdit::Day(DayOfWeek::Thursday)))
        );
        assert_eq!(Command::parse("retry").unwrap(), Some(Command::Retry));
        assert_eq!(
            Command::parse("profile bio Calculus  tutor").unwrap(),
            Some(Command::Profile {
                field: ProfileField::Bio,
                value: "Calculus  tutor".to_string(),
            })
        );
        assert_eq!(Command::parse("save").unwrap(), Some(Command::Save));
    }

    #[tokio::test]
    async fn test_student_books_from_console() {
        let (state, api) = app_state(MemoryApi::new().with_slots(vec![
            weekly_slot(1, DayOfWeek::Monday, 9, false),
            weekly_slot(2, DayOfWeek::Tuesday, 9, true),
        ]));
        let console = Console::new(state.clone());

        let start = console.start().await;
        assert!(start[0].starts_with("Please log in"));

        let welcome = console
            .execute(Command::parse("login lee@uni.edu secret").unwrap().unwrap())
            .await;
        assert_eq!(welcome[0], "Welcome, Lee Park (Student)");
        assert!(welcome.iter().any(|l| l.contains("#1 every Monday 09:00-10:00")));
        assert!(!welcome.iter().any(|l| l.contains("#2 ")));

        let out = console.execute(Command::Book).await;
        assert_eq!(out, vec!["! Select a time slot first".to_string()]);
        assert_eq!(api.call_count("request_booking"), 0);

        console.execute(Command::Select(1)).await;
        let out = console.execute(Command::Book).await;
        assert!(out[0].contains("[pending]"));

        let toasts = console.execute(Command::Toasts).await;
        assert!(toasts.iter().any(|t| t.contains("Booking request sent")));
        assert_eq!(console.execute(Command::Toasts).await, vec!["No notifications"]);
    }

    #[tokio::test]
    async fn test_tutor_pages_from_console() {
        let (state, _api) = app_state(
            MemoryApi::new()
                .logged_in_as(tutor())
                .with_bookings(vec![pending_request(10, 1)]),
        );
        let console = Console::new(state);

        let start = console.start().await;
        assert!(start.contains(&"== Tutor Dashboard ==".to_string()));
        assert!(start.contains(&"Pending requests: 1".to_string()));

        let out = console
            .execute(Command::parse("add wed 14:00 16:00").unwrap().unwrap())
            .await;
        assert!(out[0].starts_with("Added #"));
        assert!(out[0].ends_with("Wednesday 14:00-16:00"));

        let out = console.execute(Command::Confirm(10)).await;
        assert!(out[0].contains("[confirmed]"));

        let out = console.execute(Command::Open(Page::Calendar)).await;
        assert_eq!(out, vec!["! Not found".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_add_keeps_dialog_for_retry() {
        let (state, api) = app_state(MemoryApi::new().logged_in_as(tutor()).with_schedule(vec![
            ScheduleEntry {
                id: 1,
                day_of_week: DayOfWeek::Tuesday,
                start_time: time(9, 0),
                end_time: time(11, 0),
            },
        ]));
        let console = Console::new(state);
        console.start().await;

        let out = console.execute(run("add tue 10:00 12:00")).await;
        assert_eq!(out[0], "Add availability: Tuesday 10:00-12:00");
        assert_eq!(out[1], "! Overlaps an existing availability");
        let dialog = console.dashboard.dialog();
        assert!(dialog.open);
        assert_eq!(
            dialog.error.as_deref(),
            Some("Overlaps an existing availability")
        );

        let out = console.execute(run("edit start 11:00")).await;
        assert_eq!(out[0], "Add availability: Tuesday 11:00-12:00");

        let out = console.execute(Command::Retry).await;
        assert!(out[0].ends_with("Tuesday 11:00-12:00"));
        assert!(!console.dashboard.dialog().open);
        assert_eq!(api.call_count("create_schedule_entry"), 2);

        assert_eq!(console.execute(Command::Retry).await, vec![NO_DIALOG.to_string()]);
    }

    #[tokio::test]
    async fn test_add_after_failure_replaces_fields() {
        let (state, _api) = app_state(MemoryApi::new().logged_in_as(tutor()));
        let console = Console::new(state);
        console.start().await;

        let out = console.execute(run("add mon 09:00 nine")).await;
        assert!(out.iter().any(|l| l.starts_with("! Invalid time for end")));
        assert!(console.dashboard.dialog().open);

        let out = console.execute(run("add fri 09:00 10:00")).await;
        assert!(out[0].ends_with("Friday 09:00-10:00"));

        console.execute(run("add fri 09:30 10:30")).await;
        assert_eq!(console.execute(Command::Cancel).await, vec!["Dialog closed"]);
        assert!(!console.dashboard.dialog().open);
    }

    #[tokio::test]
    async fn test_requests_listed_pending_first() {
        let mut decided = pending_request(11, 2);
        decided.status = tutorhub_core::BookingStatus::Confirmed;
        let (state, _api) = app_state(
            MemoryApi::new()
                .logged_in_as(tutor())
                .with_bookings(vec![decided, pending_request(12, 3)]),
        );
        let console = Console::new(state);
        console.start().await;

        let out = console.execute(Command::Requests).await;
        assert_eq!(out[0], "Pending: 1");
        assert!(out[1].starts_with("#12 [pending]"));
        assert_eq!(out[2], "Decided:");
        assert!(out[3].starts_with("#11 [confirmed]"));

        // The dashboard page now opens on the requests tab
        let out = console.execute(Command::Open(Page::TutorDashboard)).await;
        assert_eq!(out[1], "Pending: 1");
    }

    #[tokio::test]
    async fn test_listing_commands_reload() {
        let (state, api) = app_state(MemoryApi::new().logged_in_as(student()).with_slots(vec![
            weekly_slot(1, DayOfWeek::Monday, 9, false),
            weekly_slot(2, DayOfWeek::Tuesday, 9, false),
        ]));
        let console = Console::new(state);
        console.start().await;

        api.book_elsewhere(2);
        let out = console.execute(Command::Slots).await;
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("#1 "));
        assert_eq!(api.call_count("list_availabilities"), 2);

        let out = console.execute(Command::Sessions).await;
        assert!(out.is_empty());
        assert_eq!(api.call_count("community_sessions"), 1);
    }

    #[tokio::test]
    async fn test_profile_edit_and_save() {
        let (state, _api) = app_state(MemoryApi::new().logged_in_as(student()));
        let console = Console::new(state.clone());
        console.start().await;

        let out = console.execute(run("profile name Lee P.")).await;
        assert!(out[0].starts_with("Open the profile page first"));

        let out = console.execute(Command::Open(Page::Profile)).await;
        assert!(out.contains(&"  name:  Lee Park".to_string()));

        let out = console.execute(run("profile phone 555-0100")).await;
        assert_eq!(out[1], "  phone: 555-0100");
        console.execute(run("profile name")).await;
        assert_eq!(
            console.execute(Command::Save).await,
            vec!["! Name is required".to_string()]
        );

        console.execute(run("profile name Lee P.")).await;
        assert_eq!(
            console.execute(Command::Save).await,
            vec!["Profile saved for Lee P.".to_string()]
        );
        assert_eq!(state.notifier.latest().unwrap().message, "Profile updated");
    }

    #[tokio::test]
    async fn test_login_while_logged_in() {
        let (state, api) = app_state(MemoryApi::new().logged_in_as(tutor()));
        let console = Console::new(state);
        console.start().await;

        let out = console.execute(run("login lee@uni.edu secret")).await;
        assert_eq!(out, vec!["Already logged in as dana@uni.edu (logout first)"]);
        assert_eq!(api.call_count("login"), 0);
    }

    #[tokio::test]
    async fn test_community_from_console() {
        let (state, _api) = app_state(
            MemoryApi::new()
                .logged_in_as(student())
                .with_community(vec![class_session(1, "Calculus I")], vec![post(42, 1, "Exam prep")]),
        );
        let console = Console::new(state);
        console.start().await;

        let out = console.execute(Command::Open(Page::Community)).await;
        assert!(out.contains(&"> #1 Calculus I".to_string()));

        let out = console
            .execute(Command::parse("comment 42 Thanks!").unwrap().unwrap())
            .await;
        assert!(out.iter().any(|l| l == "    > Lee Park: Thanks!"));

        let out = console.execute(Command::parse("post  | body").unwrap().unwrap()).await;
        assert_eq!(out, vec!["! Title is required".to_string()]);
    }

    #[test]
    fn test_calendar_marks() {
        let slot = weekly_slot(1, DayOfWeek::Wednesday, 9, false);
        let grid = CalendarMonth::build(2026, 10, &[slot], &[]).unwrap();
        let lines = calendar_lines(&grid);

        assert_eq!(lines[0], "October 2026");
        assert!(lines[1].starts_with("Mon"));
        assert!(lines.iter().any(|l| l.contains(" 7*")));
        assert!(lines.iter().any(|l| l.contains("14*")));
    }
}
