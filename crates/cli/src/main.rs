use clap::{Parser, Subcommand};
use hpms_core::config::BackendConfig;
use hpms_core::model::{
    Admission, AdmissionForm, Billing, BillingForm, MedicalRecord, MedicalRecordForm, Patient,
    PatientForm,
};
use hpms_core::{ChatRelay, CoreConfig, PatientService, RecordStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "hpms")]
#[command(about = "Hospital patient management CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients, newest first
    List {
        /// Only show patients whose name, phone or email contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Register a new patient
    AddPatient {
        full_name: String,
        /// Date of birth (YYYY-MM-DD)
        date_of_birth: String,
        /// Male, Female or Other
        gender: String,
        contact_number: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        emergency_contact_name: Option<String>,
        #[arg(long)]
        emergency_contact_number: Option<String>,
        /// A+, A-, B+, B-, AB+, AB-, O+ or O-
        #[arg(long)]
        blood_group: Option<String>,
        #[arg(long)]
        allergies: Option<String>,
    },
    /// Show a patient with medical records, admission and billing
    Show { id: Uuid },
    /// Add a medical record to a patient
    AddRecord {
        id: Uuid,
        illness: String,
        symptoms: String,
        doctor_name: String,
        #[arg(long)]
        diagnosis: Option<String>,
        #[arg(long)]
        prescription: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Record a patient's admission
    Admit {
        id: Uuid,
        #[arg(long)]
        floor: Option<String>,
        #[arg(long)]
        room: Option<String>,
        /// Admission date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Discharge date (YYYY-MM-DD)
        #[arg(long)]
        discharge: Option<String>,
        /// Record the patient as not currently admitted
        #[arg(long)]
        not_admitted: bool,
    },
    /// Record a patient's bill
    Bill {
        id: Uuid,
        total_amount: String,
        #[arg(long)]
        paid: Option<String>,
        /// pending, partial or paid
        #[arg(long)]
        status: Option<String>,
    },
    /// Ask the assistant about the stored patients
    Chat {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hpms_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cfg = CoreConfig::from_lookup(|k| std::env::var(k).ok())?;
    if matches!(cfg.backend(), BackendConfig::Memory) {
        anyhow::bail!("HPMS_BACKEND_URL and HPMS_BACKEND_KEY must be set to use the CLI");
    }
    let store = RecordStore::from_config(&cfg)?;
    let service = PatientService::new(store.clone());

    match cli.command {
        Commands::List { search } => {
            let patients = service.list_patients(search.as_deref()).await?;
            if patients.is_empty() {
                println!("No patients found.");
            }
            for patient in &patients {
                print_patient_line(patient);
            }
        }
        Commands::AddPatient {
            full_name,
            date_of_birth,
            gender,
            contact_number,
            email,
            address,
            emergency_contact_name,
            emergency_contact_number,
            blood_group,
            allergies,
        } => {
            let patient = service
                .create_patient(PatientForm {
                    full_name,
                    date_of_birth,
                    gender,
                    contact_number,
                    email,
                    address,
                    emergency_contact_name,
                    emergency_contact_number,
                    blood_group,
                    allergies,
                })
                .await?;
            println!("Created patient with ID: {}", patient.id);
        }
        Commands::Show { id } => {
            let details = service.patient_details(id).await?;
            print_patient(&details.patient);

            println!("\nMedical records ({}):", details.medical_records.len());
            for record in &details.medical_records {
                print_record(record);
            }

            println!("\nAdmission:");
            match &details.admission {
                Some(admission) => print_admission(admission),
                None => println!("  none"),
            }

            println!("\nBilling:");
            match &details.billing {
                Some(billing) => print_billing(billing),
                None => println!("  none"),
            }
        }
        Commands::AddRecord {
            id,
            illness,
            symptoms,
            doctor_name,
            diagnosis,
            prescription,
            notes,
        } => {
            let record = service
                .add_medical_record(
                    id,
                    MedicalRecordForm {
                        illness,
                        symptoms,
                        diagnosis,
                        prescription,
                        doctor_name,
                        notes,
                    },
                )
                .await?;
            println!("Added medical record {} for patient {}", record.id, id);
        }
        Commands::Admit {
            id,
            floor,
            room,
            date,
            discharge,
            not_admitted,
        } => {
            let admission = service
                .add_admission(
                    id,
                    AdmissionForm {
                        is_admitted: Some(!not_admitted),
                        admission_date: date,
                        floor_number: floor,
                        room_number: room,
                        discharge_date: discharge,
                    },
                )
                .await?;
            println!("Recorded admission {} for patient {}", admission.id, id);
        }
        Commands::Bill {
            id,
            total_amount,
            paid,
            status,
        } => {
            let billing = service
                .add_billing(
                    id,
                    BillingForm {
                        total_amount,
                        amount_paid: paid,
                        payment_status: status,
                    },
                )
                .await?;
            println!(
                "Recorded bill {} for patient {} (due: {:.2})",
                billing.id, id, billing.amount_due
            );
        }
        Commands::Chat { message } => {
            let relay = ChatRelay::new(store, &cfg)?;
            let answer = relay.ask(&message.join(" ")).await?;
            println!("{answer}");
        }
    }

    Ok(())
}

fn print_patient_line(p: &Patient) {
    println!(
        "ID: {}, Name: {}, Phone: {}, Email: {}, Created: {}",
        p.id,
        p.full_name,
        p.contact_number,
        p.email.as_deref().unwrap_or("-"),
        p.created_at.format("%Y-%m-%d")
    );
}

fn print_patient(p: &Patient) {
    println!("{} ({})", p.full_name, p.id);
    println!("  Date of birth: {}", p.date_of_birth);
    println!(
        "  Gender: {}",
        p.gender.map(|g| g.as_str()).unwrap_or("-")
    );
    println!("  Phone: {}", p.contact_number);
    println!("  Email: {}", p.email.as_deref().unwrap_or("-"));
    println!("  Address: {}", p.address.as_deref().unwrap_or("-"));
    println!(
        "  Emergency contact: {} {}",
        p.emergency_contact_name.as_deref().unwrap_or("-"),
        p.emergency_contact_number.as_deref().unwrap_or("")
    );
    println!(
        "  Blood group: {}",
        p.blood_group.map(|b| b.as_str()).unwrap_or("-")
    );
    println!("  Allergies: {}", p.allergies.as_deref().unwrap_or("-"));
}

fn print_record(r: &MedicalRecord) {
    println!(
        "  [{}] {} - symptoms: {}; doctor: {}",
        r.created_at.format("%Y-%m-%d"),
        r.illness,
        r.symptoms,
        r.doctor_name
    );
    if let Some(diagnosis) = &r.diagnosis {
        println!("    diagnosis: {diagnosis}");
    }
    if let Some(prescription) = &r.prescription {
        println!("    prescription: {prescription}");
    }
    if let Some(notes) = &r.notes {
        println!("    notes: {notes}");
    }
}

fn print_admission(a: &Admission) {
    println!(
        "  {} floor {} room {}",
        if a.is_admitted { "Admitted," } else { "Not admitted," },
        a.floor_number
            .map(|f| f.to_string())
            .unwrap_or_else(|| "-".into()),
        a.room_number.as_deref().unwrap_or("-")
    );
    if let Some(date) = a.admission_date {
        println!("  Admitted on: {date}");
    }
    if let Some(date) = a.discharge_date {
        println!("  Discharged on: {date}");
    }
}

fn print_billing(b: &Billing) {
    println!(
        "  Total: {:.2}, Paid: {:.2}, Due: {:.2}, Status: {}",
        b.total_amount, b.amount_paid, b.amount_due, b.payment_status
    );
}
