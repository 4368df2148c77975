use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ward_core::{
    data_dir_from_env_value, Admission, CoreConfig, ErQueue, PatientQuery, PatientRecord,
    PatientRegistry,
};

#[derive(Parser)]
#[command(name = "ward")]
#[command(about = "Ward patient and ER queue records CLI")]
struct Cli {
    /// Directory holding patients.txt and erqueue.txt (defaults to WARD_DATA_DIR, then .)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Admit a patient
    Add {
        name: String,
        age: i32,
        gender: String,
        diagnosis: String,
        /// Admission date (defaults to today, YYYY-MM-DD)
        #[arg(long)]
        admission_date: Option<String>,
    },
    /// Delete a patient record
    Delete { id: u32 },
    /// Show one patient
    Show {
        id: u32,
        #[arg(long)]
        json: bool,
    },
    /// Replace a patient's diagnosis
    UpdateDiagnosis { id: u32, diagnosis: String },
    /// Discharge a patient
    Discharge {
        id: u32,
        /// Discharge date (defaults to today, YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// List all patients in admission order
    List {
        #[arg(long)]
        json: bool,
    },
    /// Search patients by id or by part of the name
    Search {
        #[arg(long, conflicts_with = "name", required_unless_present = "name")]
        id: Option<u32>,
        /// Case-sensitive part of the patient name
        #[arg(long)]
        name: Option<String>,
    },
    /// Treatment history commands
    #[command(subcommand)]
    Treatment(TreatmentCommands),
    /// ER queue commands
    #[command(subcommand)]
    Er(ErCommands),
}

#[derive(Subcommand)]
enum TreatmentCommands {
    /// Record a treatment
    Add { id: u32, description: String },
    /// Remove the most recent history entry
    Undo { id: u32 },
    /// Show the history, most recent first
    History { id: u32 },
}

#[derive(Subcommand)]
enum ErCommands {
    /// Add a patient to the ER queue
    Enqueue {
        name: String,
        /// 1-5, 5 = highest (informational only)
        priority: i32,
    },
    /// Process the next ER patient (first come, first served)
    Dequeue,
    /// List the ER queue from next to last
    List {
        #[arg(long)]
        json: bool,
    },
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn print_patient(patient: &PatientRecord) {
    println!(
        "ID: {}, Name: {}, Age: {}, Gender: {}, Diagnosis: {}, Admitted: {}, Discharged: {}, Status: {}",
        patient.id,
        patient.name,
        patient.age,
        patient.gender,
        patient.diagnosis,
        patient.admission_date,
        patient.discharge_date,
        patient.status
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| data_dir_from_env_value(std::env::var("WARD_DATA_DIR").ok()));
    let cfg = CoreConfig::new(data_dir)?;

    match cli.command {
        Some(Commands::Add {
            name,
            age,
            gender,
            diagnosis,
            admission_date,
        }) => {
            let mut registry = PatientRegistry::open(&cfg)?;
            let admission = Admission {
                name,
                age,
                gender,
                diagnosis,
                admission_date: admission_date.unwrap_or_else(today),
            };
            match registry.add(admission) {
                Ok(id) => println!("Patient added with ID: {}", id),
                Err(e) => eprintln!("Error adding patient: {}", e),
            }
        }
        Some(Commands::Delete { id }) => {
            let mut registry = PatientRegistry::open(&cfg)?;
            match registry.delete(id) {
                Ok(patient) => println!("Deleted patient {} ({})", id, patient.name),
                Err(e) => eprintln!("Error deleting patient: {}", e),
            }
        }
        Some(Commands::Show { id, json }) => {
            let registry = PatientRegistry::open(&cfg)?;
            match registry.find_by_id(id) {
                Ok(patient) if json => println!("{}", serde_json::to_string_pretty(patient)?),
                Ok(patient) => print_patient(patient),
                Err(e) => eprintln!("Error finding patient: {}", e),
            }
        }
        Some(Commands::UpdateDiagnosis { id, diagnosis }) => {
            let mut registry = PatientRegistry::open(&cfg)?;
            match registry.update_diagnosis(id, &diagnosis) {
                Ok(()) => println!("Diagnosis updated for patient {}", id),
                Err(e) => eprintln!("Error updating diagnosis: {}", e),
            }
        }
        Some(Commands::Discharge { id, date }) => {
            let mut registry = PatientRegistry::open(&cfg)?;
            let date = date.unwrap_or_else(today);
            match registry.discharge(id, &date) {
                Ok(()) => println!("Patient {} discharged on {}", id, date),
                Err(e) => eprintln!("Error discharging patient: {}", e),
            }
        }
        Some(Commands::List { json }) => {
            let registry = PatientRegistry::open(&cfg)?;
            if json {
                let patients: Vec<&PatientRecord> = registry.list().collect();
                println!("{}", serde_json::to_string_pretty(&patients)?);
            } else if registry.is_empty() {
                println!("No admitted patients.");
            } else {
                registry.list().for_each(print_patient);
            }
        }
        Some(Commands::Search { id, name }) => {
            let registry = PatientRegistry::open(&cfg)?;
            let query = match (id, name) {
                (Some(id), _) => PatientQuery::Id(id),
                (None, Some(name)) => PatientQuery::NameContains(name),
                (None, None) => {
                    eprintln!("Error searching patients: pass --id or --name");
                    return Ok(());
                }
            };
            match registry.search(&query) {
                Ok(found) => found.into_iter().for_each(print_patient),
                Err(e) => eprintln!("Error searching patients: {}", e),
            }
        }
        Some(Commands::Treatment(command)) => {
            let mut registry = PatientRegistry::open(&cfg)?;
            match command {
                TreatmentCommands::Add { id, description } if description.is_empty() => {
                    eprintln!("Error adding treatment to {}: description cannot be empty", id);
                }
                TreatmentCommands::Add { id, description } => {
                    match registry.add_treatment(id, &description) {
                        Ok(()) => println!("Treatment added."),
                        Err(e) => eprintln!("Error adding treatment: {}", e),
                    }
                }
                TreatmentCommands::Undo { id } => match registry.undo_last_treatment(id) {
                    Ok(entry) => println!("Undo treatment: {}", entry),
                    Err(e) => eprintln!("Error undoing treatment: {}", e),
                },
                TreatmentCommands::History { id } => match registry.treatment_history(id) {
                    Ok(history) if history.is_empty() => println!("No treatment history."),
                    Ok(history) => history.into_iter().for_each(|entry| println!("- {}", entry)),
                    Err(e) => eprintln!("Error reading treatment history: {}", e),
                },
            }
        }
        Some(Commands::Er(command)) => {
            let mut queue = ErQueue::open(&cfg)?;
            match command {
                ErCommands::Enqueue { name, priority } => match queue.enqueue(&name, priority) {
                    Ok(id) => println!("ER patient added with ID: {}", id),
                    Err(e) => eprintln!("Error adding ER patient: {}", e),
                },
                ErCommands::Dequeue => match queue.dequeue() {
                    Ok(intake) => println!("Processing ER patient: {}", intake.name),
                    Err(e) => eprintln!("Error processing ER queue: {}", e),
                },
                ErCommands::List { json } => {
                    if json {
                        let intakes: Vec<_> = queue.list().collect();
                        println!("{}", serde_json::to_string_pretty(&intakes)?);
                    } else if queue.is_empty() {
                        println!("ER queue empty.");
                    } else {
                        for (position, intake) in queue.list().enumerate() {
                            println!(
                                "No. {}, ID: {}, Name: {}, Priority: {}",
                                position + 1,
                                intake.id,
                                intake.name,
                                intake.priority
                            );
                        }
                    }
                }
            }
        }
        None => {
            println!("Use 'ward --help' for commands");
        }
    }

    Ok(())
}
