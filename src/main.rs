use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use clinic_desk::config::Config;
use clinic_desk::console::{AssumeYes, StderrNotifier, StdinConfirmer};
use clinic_desk::form::DraftField;
use clinic_desk::models::AppState;
use clinic_desk::sync::{Confirmer, DeleteOutcome, SubmitOutcome};
use clinic_desk::{Desk, HttpClinicApi, db, routes};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Clinic appointment desk", long_about = None)]
#[clap(propagate_version = true)]
struct CliArgs {
    /// Base URL of the clinic API (overrides CLINIC_API_URL)
    #[clap(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Commands {
    /// Show stats, patients, doctors and all appointments
    Dashboard,
    /// Book a new appointment
    Book {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        doctor: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        reason: String,
    },
    /// Edit an existing appointment; omitted fields keep their value
    Edit {
        id: i64,
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        doctor: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Delete an appointment
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Run the clinic REST API
    Serve,
    /// Drop all tables; the next `serve` re-seeds sample data
    ResetDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let mut cfg = Config::from_env()?;
    if let Some(url) = args.api_url {
        cfg.api_url = url;
    }

    match args.command.unwrap_or(Commands::Dashboard) {
        Commands::Serve => serve(&cfg).await.map(|_| ExitCode::SUCCESS),
        Commands::ResetDb => reset_db(&cfg).await.map(|_| ExitCode::SUCCESS),
        command => run_desk(&cfg, command).await,
    }
}

async fn serve(cfg: &Config) -> anyhow::Result<()> {
    let pool = db::connect_sqlite(&cfg.database_url).await?;
    db::init(&pool).await?;

    let app = routes::app(AppState { db: pool });

    tracing::info!("Listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn reset_db(cfg: &Config) -> anyhow::Result<()> {
    let pool = db::connect_sqlite(&cfg.database_url).await?;
    let dropped = db::reset(&pool).await?;
    println!("Dropped {} tables. Sample data is re-created on next start.", dropped.len());
    Ok(())
}

async fn run_desk(cfg: &Config, command: Commands) -> anyhow::Result<ExitCode> {
    let api = HttpClinicApi::new(&cfg.api_url, cfg.http_timeout)?;
    let mut desk = Desk::new(Arc::new(api), Arc::new(StderrNotifier));
    desk.load().await;

    let ok = match command {
        Commands::Book {
            patient,
            doctor,
            date,
            time,
            reason,
        } => {
            let form = desk.form_mut();
            form.set_field(DraftField::PatientId, patient);
            form.set_field(DraftField::DoctorId, doctor);
            form.set_field(DraftField::Date, date);
            form.set_field(DraftField::Time, time);
            form.set_field(DraftField::Reason, reason);
            report_submit(desk.submit().await)
        }
        Commands::Edit {
            id,
            patient,
            doctor,
            date,
            time,
            reason,
        } => {
            if !desk.begin_edit(id) {
                eprintln!("Appointment {id} not found.");
                return Ok(ExitCode::FAILURE);
            }
            let changes = [
                (DraftField::PatientId, patient),
                (DraftField::DoctorId, doctor),
                (DraftField::Date, date),
                (DraftField::Time, time),
                (DraftField::Reason, reason),
            ];
            for (field, value) in changes {
                if let Some(value) = value {
                    desk.form_mut().set_field(field, value);
                }
            }
            report_submit(desk.submit().await)
        }
        Commands::Delete { id, yes } => {
            let confirmer: &dyn Confirmer = if yes {
                &AssumeYes as &dyn Confirmer
            } else {
                &StdinConfirmer
            };
            match desk.delete(id, confirmer).await {
                Ok(DeleteOutcome::Deleted) => {
                    println!("Appointment {id} deleted.");
                    true
                }
                Ok(DeleteOutcome::Cancelled) => true,
                Err(_) => false,
            }
        }
        Commands::Dashboard | Commands::Serve | Commands::ResetDb => true,
    };

    print!("{}", desk.render());
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn report_submit(result: Result<SubmitOutcome, clinic_desk::ClientError>) -> bool {
    match result {
        Ok(SubmitOutcome::Created(a)) => {
            println!("Booked appointment #{}.", a.id);
            true
        }
        Ok(SubmitOutcome::Updated(a)) => {
            println!("Updated appointment #{}.", a.id);
            true
        }
        // already alerted
        Err(_) => false,
    }
}
