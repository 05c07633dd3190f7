use api_shared::UserRole;
use clap::{Parser, Subcommand};
use eazydoc_client::{navigation, HttpUserApi, LoginDialog, RegisterData, SubmitOutcome};
use eazydoc_core::{seed::seed_demo, AppointmentService, CoreConfig, Database, DEFAULT_DATA_DIR};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "eazydoc")]
#[command(about = "Eazydoc scheduling service CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert demo patient, doctor, ambulance and appointments
    Seed {
        /// Data directory holding database.json
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Print one appointment with its relations as JSON
    ShowAppointment {
        /// Appointment id
        id: String,
        /// Data directory holding database.json
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,
    },
    /// Print the dashboard navigation for a role (patient, doctor or admin)
    Nav {
        role: String,
    },
    /// Register a patient account against a running server
    Register {
        name: String,
        email: String,
        password: String,
        /// Password confirmation (defaults to the password)
        #[arg(long)]
        confirm: Option<String>,
        /// Base URL of the REST API
        #[arg(long, default_value = "http://localhost:3000")]
        url: String,
    },
}

fn open_database(data_dir: PathBuf) -> Result<Arc<Database>, Box<dyn std::error::Error>> {
    let cfg = CoreConfig::new(Some(data_dir))?;
    Ok(Arc::new(Database::open(&cfg)?))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Seed { data_dir }) => {
            let db = open_database(data_dir)?;
            match seed_demo(db) {
                Ok(summary) => {
                    println!("Patient: {}", summary.patient_id);
                    println!("Doctor: {}", summary.doctor_id);
                    println!("Ambulance: {}", summary.ambulance_id);
                    for id in summary.appointment_ids {
                        println!("Appointment: {}", id);
                    }
                }
                Err(e) => eprintln!("Error seeding data: {}", e),
            }
        }
        Some(Commands::ShowAppointment { id, data_dir }) => {
            let service = AppointmentService::new(open_database(data_dir)?);
            match service.fetch(&id) {
                Ok(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
                Err(e) => eprintln!("Error fetching appointment: {}", e),
            }
        }
        Some(Commands::Nav { role }) => {
            let items = navigation(UserRole::from_wire(&role));
            if items.is_empty() {
                println!("No navigation for role '{}'.", role);
            } else {
                for item in items {
                    println!("{:<14} {:<28} {:?}", item.label, item.path, item.icon);
                }
            }
        }
        Some(Commands::Register {
            name,
            email,
            password,
            confirm,
            url,
        }) => {
            let api = HttpUserApi::new(url)?;
            let mut dialog = LoginDialog::for_registration();
            dialog.register = RegisterData {
                name,
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };

            match dialog.submit(&api).await {
                SubmitOutcome::Registered(res) => {
                    println!("{} (id: {})", res.message, res.user.id)
                }
                SubmitOutcome::Rejected | SubmitOutcome::Busy => {
                    eprintln!("Registration failed: {}", dialog.error().unwrap_or("unknown error"))
                }
            }
        }
        None => {
            println!("Use 'eazydoc --help' for commands");
        }
    }

    Ok(())
}
