use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::Utc;
use clap::Subcommand;
use tracing::debug;

use social::{
    Admission, ComposeOutcome, FollowToggle, ImageUpload, NavAction, ProfileUpdate,
    Publication, Registration, SessionContext, Severity, Social, ToastQueue, User,
    constants::FIRST_PAGE,
    list::{PageSource, PaginatedList},
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and keep the session for later commands.
    Login {
        email: String,
        /// Read from the prompt when omitted.
        #[arg(long, env = "SOCIAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account. Does not log in.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        nick: String,
        #[arg(long)]
        email: String,
        /// Read from the prompt when omitted.
        #[arg(long, env = "SOCIAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    /// Resolve a client path (e.g. `/`, `/users`, `/profile/<id>`) through the auth gate.
    Open { path: String },
    /// Show the feed.
    Feed {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List registered users.
    Users {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show a user's publications.
    Posts {
        user: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Users followed by USER, or by you.
    Following {
        user: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Users following USER, or you.
    Followers {
        user: Option<String>,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Publish TEXT, optionally with an image.
    Post {
        text: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Show one publication.
    Show { id: String },
    /// Delete one of your publications.
    Delete { id: String },
    /// Follow a user.
    Follow { id: String },
    /// Stop following a user.
    Unfollow { id: String },
    /// Show a profile, yours by default.
    Profile { id: Option<String> },
    /// Show a user's following/followers/publications counts.
    Counters { id: String },
    /// Change fields of your profile.
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        surname: Option<String>,
        #[arg(long)]
        nick: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    /// Upload a new avatar image.
    Avatar { path: PathBuf },
}

impl Command {
    /// Whether the stored session should be confirmed with the server first.
    fn validates_session(&self) -> bool {
        !matches!(
            self,
            Command::Login { .. } | Command::Register { .. } | Command::Logout
        )
    }
}

/// Everything a command runs against.
pub struct App {
    pub social: Social,
    pub session: SessionContext,
    pub toasts: ToastQueue,
}

impl App {
    pub async fn run(&self, command: Command) -> Result<()> {
        if command.validates_session() {
            let state = self.session.rehydrate_and_validate().await;
            debug!(?state, "Session settled");
        } else {
            self.session.rehydrate();
        }

        let result = self.dispatch(command).await;
        self.flush_toasts();
        result
    }

    async fn dispatch(&self, command: Command) -> Result<()> {
        let social = &self.social;
        let session = &self.session;

        match command {
            Command::Login { email, password } => {
                let password = password_or_prompt(password)?;
                let user = session.login(&email, &password).await?;
                println!("Logged in as {} (@{})", user.display_name(), user.handle);
            }
            Command::Register {
                name,
                surname,
                nick,
                email,
                password,
            } => {
                let registration = Registration {
                    name,
                    surname,
                    nick,
                    email,
                    password: password_or_prompt(password)?,
                };
                session.register(&registration).await?;
                println!("Registered @{}. Run `social login` to start.", registration.nick);
            }
            Command::Logout => {
                session.logout();
                println!("Logged out");
            }
            Command::Whoami => match session.current_user() {
                Some(user) => print_user(&user),
                None => println!("Not logged in"),
            },
            Command::Open { path } => {
                let mut router = social.router(session);
                match router.navigate(&path) {
                    Admission::Render(route) => println!("render {route}"),
                    Admission::Pending(route) => println!("pending {route}"),
                    Admission::Redirect(route) => println!("redirect {route}"),
                }
                let links: Vec<_> = router
                    .nav_links()
                    .into_iter()
                    .map(|link| match link.action {
                        NavAction::Go(route) => format!("{} ({route})", link.label),
                        NavAction::Logout => link.label.to_string(),
                    })
                    .collect();
                println!("nav: {}", links.join(" | "));
            }
            Command::Feed { pages } => {
                let feed = social.feed(session);
                print_publications(social, session, &collect(&feed, pages).await?);
                print_footer(&feed);
            }
            Command::Users { pages } => {
                let users = social.users(session);
                collect(&users, pages).await?.iter().for_each(print_user);
                print_footer(&users);
            }
            Command::Posts { user, pages } => {
                let posts = social.user_publications(session, &user);
                print_publications(social, session, &collect(&posts, pages).await?);
                print_footer(&posts);
            }
            Command::Following { user, pages } => {
                let following = social.following(session, user.as_deref());
                collect(&following, pages).await?.iter().for_each(print_user);
                print_footer(&following);
            }
            Command::Followers { user, pages } => {
                let followers = social.followers(session, user.as_deref());
                collect(&followers, pages).await?.iter().for_each(print_user);
                print_footer(&followers);
            }
            Command::Post { text, image } => {
                let mut composer = social.composer(session);
                composer.set_text(text);
                if let Some(path) = image {
                    composer.attach(ImageUpload::from_path(path).await?);
                }
                match composer.submit(|_| async {}).await? {
                    ComposeOutcome::Published(publication) => {
                        println!("Published {}", publication.id);
                    }
                    ComposeOutcome::ImagePending { publication, error } => {
                        println!(
                            "Published {} without its image: {}",
                            publication.id,
                            error.user_message()
                        );
                    }
                }
            }
            Command::Show { id } => {
                let publication = session.api().publication(&id).await?;
                print_publications(social, session, std::slice::from_ref(&publication));
            }
            Command::Delete { id } => {
                let Some(viewer) = session.viewer_id() else {
                    bail!("You need to log in first");
                };
                social.user_publications(session, &viewer).delete(&id).await?;
                println!("Deleted {id}");
            }
            Command::Follow { id } => self.set_following(&id, true).await?,
            Command::Unfollow { id } => self.set_following(&id, false).await?,
            Command::Profile { id } => {
                let user = session.api().profile(id.as_deref()).await?;
                print_user(&user);
                if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
                    println!("  {bio}");
                }
            }
            Command::Counters { id } => {
                let counters = session.api().counters(&id).await?;
                println!(
                    "following {}  followers {}  publications {}",
                    counters.following, counters.followed, counters.publications
                );
            }
            Command::UpdateProfile {
                name,
                surname,
                nick,
                email,
                bio,
            } => {
                let update = ProfileUpdate {
                    name,
                    surname,
                    nick,
                    email,
                    bio,
                };
                if update.is_empty() {
                    bail!("Nothing to update; pass at least one field");
                }
                match session.update_profile(&update).await? {
                    Some(user) => print_user(&user),
                    None => println!("Profile updated"),
                }
            }
            Command::Avatar { path } => {
                let image = ImageUpload::from_path(path).await?;
                session.upload_avatar(&image).await?;
                println!("Avatar updated");
            }
        }
        Ok(())
    }

    async fn set_following(&self, id: &str, follow: bool) -> Result<()> {
        let user = self.session.api().profile(Some(id)).await?;
        let card = self.social.user_card(&self.session, user, !follow);
        match card.toggle_follow().await? {
            FollowToggle::Followed => println!("Following @{}", card.user().handle),
            FollowToggle::Unfollowed => println!("No longer following @{}", card.user().handle),
            FollowToggle::Dropped => {}
        }
        Ok(())
    }

    fn flush_toasts(&self) {
        for toast in self.toasts.drain() {
            match toast.severity {
                Severity::Info => eprintln!("{}: {}", toast.title, toast.description),
                Severity::Error => eprintln!("error: {}", toast.description),
            }
        }
    }
}

async fn collect<S: PageSource>(list: &PaginatedList<S>, pages: u32) -> Result<Vec<S::Item>> {
    list.load(FIRST_PAGE).await?;
    for _ in 1..pages {
        if !list.can_load_more() {
            break;
        }
        list.load_more().await?;
    }
    Ok(list.items())
}

fn print_footer<S: PageSource>(list: &PaginatedList<S>) {
    println!(
        "-- page {}/{}, {} total",
        list.current_page(),
        list.total_pages(),
        list.total_count()
    );
}

fn print_user(user: &User) {
    println!("{} @{} [{}]", user.display_name(), user.handle, user.id);
}

fn print_publications(social: &Social, session: &SessionContext, publications: &[Publication]) {
    let now = Utc::now();
    for publication in publications {
        let card = social.publication_card(session, publication.clone());
        let when = card.time_ago(now).unwrap_or_default();
        let mine = if card.is_owner() { " (yours)" } else { "" };
        println!(
            "{} {} · {when}{mine} [{}]",
            card.author_name(),
            card.author_handle(),
            publication.id
        );
        println!("  {}", publication.text);
        if let Some(image) = publication.image_url.as_deref().filter(|_| publication.has_image()) {
            println!("  image: {image}");
        }
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}
