use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use household_backend::domain::day_key::{self, DayKey};
use household_backend::{Backend, HouseholdConfig, HouseholdError, MemoryConnection, Snapshot};
use log::{debug, info};
use serde::Serialize;
use shared::{
    AddTaskRequest, CookingDayRequest, CreateRecurringChoreRequest, FairnessRange,
    PauseResumeChoreRequest, PersonProfile, Principal, Timeline,
};
use std::path::PathBuf;

mod output;

#[derive(Parser)]
#[command(name = "household")]
#[command(about = "Shared household planner: tasks, recurring chores and the dinner rota")]
struct Cli {
    /// Household config file, created with defaults if missing
    #[arg(long, env = "HOUSEHOLD_CONFIG", default_value = "household-config.yaml", global = true)]
    config: PathBuf,

    /// Principal of the household member running the command
    #[arg(long = "as", env = "HOUSEHOLD_PRINCIPAL", global = true)]
    caller: Option<String>,

    /// Treat this yyyy-mm-dd date as today
    #[arg(long, global = true)]
    today: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Tasks due today and tonight's cook
    Today,
    /// Sunday-to-Saturday plan for the week containing a date
    Week {
        /// Any yyyy-mm-dd date in the week (defaults to today)
        date: Option<String>,
    },
    /// Month grid with planned days marked
    Month {
        year: Option<i32>,
        month: Option<u32>,
    },
    /// Recurring chores grouped by weekday
    Chores {
        /// Only the next few active chores
        #[arg(long)]
        upcoming: bool,
        /// Chores occurring on a yyyy-mm-dd date
        #[arg(long)]
        on: Option<String>,
    },
    /// Create a recurring chore
    AddChore {
        name: String,
        /// 0 = Sunday .. 6 = Saturday
        #[arg(long)]
        weekday: u8,
        /// daily, weekly, fortnightly or monthly
        #[arg(long, default_value = "weekly")]
        timeline: Timeline,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        assign: Option<String>,
    },
    /// Pause or resume a recurring chore
    PauseChore {
        id: u64,
        #[arg(long)]
        resume: bool,
    },
    /// This week's dinner rota
    Rota,
    /// How often each person cooked in a period
    Fairness {
        /// week, month, last4weeks, last30days or alltime
        #[arg(long)]
        range: Option<FairnessRange>,
    },
    /// List tasks
    Tasks {
        #[arg(long)]
        pending: bool,
        /// Group by due day
        #[arg(long)]
        grouped: bool,
    },
    /// Add a task
    AddTask {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date as yyyy-mm-dd
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        assign: Option<String>,
    },
    /// Mark a task done, or not done again
    Toggle { id: u64 },
    /// Delete a task you created
    DeleteTask { id: u64 },
    /// Remove your completed tasks
    ClearCompleted,
    /// Set who cooks on a day
    AssignCook {
        /// yyyy-mm-dd
        day: String,
        /// Cook's principal
        #[arg(long)]
        cook: Option<String>,
        /// Free-text cook name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        meal: Option<String>,
    },
    /// Create or replace a person profile, or list profiles
    Profile {
        principal: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, default_value = "#FF6B35")]
        color: String,
    },
    /// Fill the household with demo data
    Seed,
}

/// Everything one command invocation needs
struct Session {
    backend: Backend<MemoryConnection>,
    config: HouseholdConfig,
    data_path: PathBuf,
    caller: Option<Principal>,
    today: NaiveDate,
    json: bool,
}

impl Session {
    fn caller(&self) -> Result<&Principal> {
        self.caller
            .as_ref()
            .ok_or_else(|| anyhow!("This command changes data: pass --as <principal> or set HOUSEHOLD_PRINCIPAL"))
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text(value);
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        self.backend.snapshot()?.save(&self.data_path)?;
        info!("Saved household to {:?}", self.data_path);
        Ok(())
    }
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    Ok(text.parse::<DayKey>()?.date())
}

fn parse_principal(text: &str) -> Result<Option<Principal>> {
    Principal::parse(text).with_context(|| format!("Invalid principal '{}'", text))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn open_session(cli: &Cli) -> Result<Session> {
    let config = HouseholdConfig::load_or_create(&cli.config)?;
    let data_path = config.data_path(&cli.config);
    debug!("Using data file {:?}", data_path);

    let caller = match &cli.caller {
        Some(text) => parse_principal(text)?,
        None => None,
    };
    let today = match &cli.today {
        Some(text) => parse_date(text)?,
        None => Local::now().date_naive(),
    };

    Ok(Session {
        backend: Backend::from_snapshot(Snapshot::load(&data_path)?),
        config,
        data_path,
        caller,
        today,
        json: cli.json,
    })
}

fn run(cli: Cli) -> Result<()> {
    let session = open_session(&cli)?;
    let backend = &session.backend;
    let today = session.today;

    match cli.command {
        Commands::Today => {
            let focus = backend.calendar_service.today_focus(today)?;
            session.emit(&focus, output::print_today)?;
        }
        Commands::Week { date } => {
            let anchor = date.as_deref().map(parse_date).transpose()?.unwrap_or(today);
            let plans = backend.calendar_service.week_plan(anchor)?;
            session.emit(&plans, |p| output::print_week(p, today))?;
        }
        Commands::Month { year, month } => {
            let overview = backend.calendar_service.month_overview(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
                today,
            )?;
            session.emit(&overview, output::print_month)?;
        }
        Commands::Chores { upcoming, on } => {
            if let Some(on) = on {
                let chores = backend.chore_service.chores_for_date(parse_date(&on)?)?;
                session.emit(&chores, |c| output::print_chores(c))?;
            } else if upcoming {
                let chores = backend
                    .chore_service
                    .upcoming_chores(today, session.config.upcoming_chore_limit)?;
                session.emit(&chores, |c| output::print_chores(c))?;
            } else {
                let groups = backend.chore_service.grouped_by_weekday(today)?;
                session.emit(&groups, |g| output::print_grouped_chores(g))?;
            }
        }
        Commands::AddChore {
            name,
            weekday,
            timeline,
            description,
            assign,
        } => {
            let assigned_to = match assign {
                Some(text) => parse_principal(&text)?,
                None => None,
            };
            let chore = backend.chore_service.create_recurring_chore(
                session.caller()?,
                CreateRecurringChoreRequest {
                    name,
                    description,
                    weekday,
                    timeline,
                    assigned_to,
                },
            )?;
            session.save()?;
            session.emit(&chore, |c| println!("Created recurring chore #{} {}", c.id, c.name))?;
        }
        Commands::PauseChore { id, resume } => {
            let chore = backend.chore_service.pause_resume_recurring_chore(
                session.caller()?,
                PauseResumeChoreRequest { id, pause: !resume },
            )?;
            session.save()?;
            session.emit(&chore, |c| {
                println!("{} {}", c.name, if c.paused { "paused" } else { "resumed" })
            })?;
        }
        Commands::Rota => {
            let rota = backend.cooking_service.week_rota(today)?;
            session.emit(&rota, |r| output::print_rota(r))?;
        }
        Commands::Fairness { range } => {
            let range = range.unwrap_or(session.config.default_fairness_range);
            let stats = backend.cooking_service.fairness(range, today)?;
            session.emit(&stats, output::print_fairness)?;
        }
        Commands::Tasks { pending, grouped } => {
            let tasks = if pending {
                backend.task_service.pending_tasks()?
            } else {
                backend.task_service.tasks_sorted_by_due_date()?
            };
            if grouped {
                let groups = day_key::group_tasks_by_day(&tasks);
                session.emit(&groups, |g| output::print_task_groups(g))?;
            } else {
                session.emit(&tasks, |t| output::print_tasks(t))?;
            }
        }
        Commands::AddTask {
            name,
            description,
            due,
            assign,
        } => {
            let due_date = match due {
                Some(text) => Some(
                    day_key::date_to_timestamp(parse_date(&text)?)
                        .ok_or_else(|| anyhow!("{} has no local noon", text))?,
                ),
                None => None,
            };
            let assigned_to = match assign {
                Some(text) => parse_principal(&text)?,
                None => None,
            };
            let task = backend.task_service.add_task(
                session.caller()?,
                AddTaskRequest {
                    name,
                    description,
                    due_date,
                    assigned_to,
                },
            )?;
            session.save()?;
            session.emit(&task, |t| println!("Added task #{} {}", t.id, t.name))?;
        }
        Commands::Toggle { id } => {
            let task = backend
                .task_service
                .toggle_task_completion(session.caller()?, id)?;
            session.save()?;
            session.emit(&task, |t| {
                println!("#{} {} is {}", t.id, t.name, if t.completed { "done" } else { "pending" })
            })?;
        }
        Commands::DeleteTask { id } => {
            let result = backend.task_service.delete_task(session.caller()?, id)?;
            session.save()?;
            session.emit(&result, |r| println!("{}", r.success_message))?;
        }
        Commands::ClearCompleted => {
            let result = backend.task_service.clear_completed_tasks(session.caller()?)?;
            session.save()?;
            session.emit(&result, |r| println!("{}", r.success_message))?;
        }
        Commands::AssignCook {
            day,
            cook,
            name,
            meal,
        } => {
            let cook = match cook {
                Some(text) => parse_principal(&text)?,
                None => None,
            };
            let assignment = backend.cooking_service.set_cooking_day(
                session.caller()?,
                CookingDayRequest {
                    day,
                    cook,
                    cook_name: name,
                    meal,
                },
            )?;
            session.save()?;
            session.emit(&assignment, |a| println!("Cooking on {} is set", a.day))?;
        }
        Commands::Profile {
            principal,
            name,
            color,
        } => match (principal, name) {
            (Some(principal), Some(display_name)) => {
                let principal = parse_principal(&principal)?
                    .ok_or_else(|| anyhow!("A profile needs a principal"))?;
                let profile = backend.profile_service.upsert_profile(PersonProfile {
                    principal,
                    display_name,
                    color,
                })?;
                session.save()?;
                session.emit(&profile, |p| println!("Saved profile for {}", p.display_name))?;
            }
            (None, None) => {
                let profiles = backend.profile_service.list_profiles()?;
                session.emit(&profiles, |p| output::print_profiles(p))?;
            }
            _ => return Err(anyhow!("Pass both a principal and --name to save a profile")),
        },
        Commands::Seed => {
            let result = backend
                .seed_service
                .populate_sample_data(session.caller()?, today)?;
            session.save()?;
            session.emit(&result, |r| {
                println!(
                    "Sample data added: {} tasks, {} chores, {} dinners",
                    r.task_ids.len(),
                    r.chore_ids.len(),
                    r.cooking_days.len()
                )
            })?;
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(cli) {
        eprintln!("Error: {}", HouseholdError::describe(&error));
        debug!("{:?}", error);
        std::process::exit(1);
    }
}
