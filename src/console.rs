//! Interactive menu console.
//!
//! Drives the patient registry and the ER queue from a line-based menu. All numeric
//! prompts re-ask until an integer is entered. End of input leaves the console from any
//! menu or prompt.

use std::io::{self, BufRead, ErrorKind, Write};
use std::str::FromStr;
use ward_core::{
    Admission, ErQueue, PatientQuery, PatientRegistry, RecordError, RecordResult,
};

const MAIN_MENU: &str = "===== Hospital Patient System =====\n\
                         1. Patient Management\n\
                         2. Treatment Management\n\
                         3. ER Management\n\
                         4. Exit\n";

const PATIENT_MENU: &str = "----- Patient Management -----\n\
                            1. Add Patient\n\
                            2. Delete Patient\n\
                            3. Update Patient Info\n\
                            4. Display All Patients\n\
                            5. Search Patient\n\
                            6. Discharge Patient\n\
                            7. Back\n";

const TREATMENT_MENU: &str = "----- Treatment Management -----\n\
                              1. Add Treatment Record\n\
                              2. Undo Last Treatment\n\
                              3. View Treatment History\n\
                              4. Back\n";

const ER_MENU: &str = "----- ER Management -----\n\
                       1. Add Patient to ER Queue\n\
                       2. Process Next ER Patient\n\
                       3. Display ER Queue\n\
                       4. Back\n";

const CHOICE_PROMPT: &str = "Enter choice: ";

pub struct Console<R, W> {
    input: R,
    out: W,
    registry: PatientRegistry,
    queue: ErQueue,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W, registry: PatientRegistry, queue: ErQueue) -> Self {
        Self {
            input,
            out,
            registry,
            queue,
        }
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        match self.main_menu() {
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                tracing::debug!("input closed, leaving console");
                Ok(())
            }
            other => other,
        }
    }

    #[cfg(test)]
    fn into_parts(self) -> (PatientRegistry, ErQueue) {
        (self.registry, self.queue)
    }

    fn main_menu(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "{}", MAIN_MENU)?;
            match self.read_number::<i64>(CHOICE_PROMPT)? {
                1 => self.patient_menu()?,
                2 => self.treatment_menu()?,
                3 => self.er_menu()?,
                4 => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn patient_menu(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "{}", PATIENT_MENU)?;
            match self.read_number::<i64>(CHOICE_PROMPT)? {
                1 => self.add_patient()?,
                2 => self.delete_patient()?,
                3 => self.update_patient()?,
                4 => self.display_patients()?,
                5 => self.search_patient()?,
                6 => self.discharge_patient()?,
                7 => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn treatment_menu(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "{}", TREATMENT_MENU)?;
            match self.read_number::<i64>(CHOICE_PROMPT)? {
                1 => self.add_treatment()?,
                2 => self.undo_treatment()?,
                3 => self.view_history()?,
                4 => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    fn er_menu(&mut self) -> io::Result<()> {
        loop {
            write!(self.out, "{}", ER_MENU)?;
            match self.read_number::<i64>(CHOICE_PROMPT)? {
                1 => self.enqueue()?,
                2 => self.dequeue()?,
                3 => self.display_queue()?,
                4 => return Ok(()),
                _ => writeln!(self.out, "Invalid option.")?,
            }
        }
    }

    // ------------------------------------------------------------------------
    // Patient management
    // ------------------------------------------------------------------------

    fn add_patient(&mut self) -> io::Result<()> {
        let name = self.read_text("Name: ")?;
        let age = self.read_number("Age: ")?;
        let gender = self.read_text("Gender: ")?;
        let diagnosis = self.read_text("Diagnosis: ")?;
        let admission_date = self.read_text("Admission Date: ")?;

        let result = self.registry.add(Admission {
            name,
            age,
            gender,
            diagnosis,
            admission_date,
        });
        match result {
            Ok(id) => writeln!(self.out, "Patient added with ID: {}", id),
            Err(e) => self.report(e),
        }
    }

    fn delete_patient(&mut self) -> io::Result<()> {
        let id = self.read_number("Enter Patient ID to delete: ")?;
        match self.registry.delete(id) {
            Ok(_) => writeln!(self.out, "Patient deleted."),
            Err(e) => self.report(e),
        }
    }

    fn update_patient(&mut self) -> io::Result<()> {
        let id = self.read_number("Enter Patient ID to update: ")?;
        let current = match self.registry.find_by_id(id) {
            Ok(patient) => patient.diagnosis.clone(),
            Err(e) => return self.report(e),
        };

        writeln!(self.out, "Current Diagnosis: {}", current)?;
        let diagnosis = self.read_text("Enter new Diagnosis: ")?;
        match self.registry.update_diagnosis(id, &diagnosis) {
            Ok(()) => writeln!(self.out, "Diagnosis updated."),
            Err(e) => self.report(e),
        }
    }

    fn display_patients(&mut self) -> io::Result<()> {
        if self.registry.is_empty() {
            return writeln!(self.out, "No admitted patients.");
        }

        writeln!(
            self.out,
            "{:<5}{:<20}{:<5}{:<10}{:<20}{:<12}{:<12}{:<10}",
            "ID", "Name", "Age", "Gender", "Diagnosis", "Admission", "Discharge", "Status"
        )?;
        for p in self.registry.list() {
            writeln!(
                self.out,
                "{:<5}{:<20}{:<5}{:<10}{:<20}{:<12}{:<12}{:<10}",
                p.id,
                p.name,
                p.age,
                p.gender,
                p.diagnosis,
                p.admission_date,
                p.discharge_date,
                p.status.as_str()
            )?;
        }
        Ok(())
    }

    fn search_patient(&mut self) -> io::Result<()> {
        let choice = self.read_number::<i64>("Search by:\n1. ID\n2. Name\nEnter choice: ")?;
        let query = match choice {
            1 => PatientQuery::Id(self.read_number("Enter ID: ")?),
            2 => PatientQuery::NameContains(self.read_text("Enter name or part: ")?),
            _ => return writeln!(self.out, "Invalid option."),
        };

        let found = match self.registry.search(&query) {
            Ok(found) => found,
            Err(RecordError::NoMatch(_)) if matches!(query, PatientQuery::NameContains(_)) => {
                return writeln!(self.out, "No patient matches.");
            }
            Err(e) => return self.report(e),
        };
        for p in found {
            match query {
                PatientQuery::Id(_) => writeln!(
                    self.out,
                    "Found: {}, Age: {}, Status: {}",
                    p.name, p.age, p.status
                )?,
                PatientQuery::NameContains(_) => writeln!(
                    self.out,
                    "Found: {}, ID: {}, Status: {}",
                    p.name, p.id, p.status
                )?,
            }
        }
        Ok(())
    }

    fn discharge_patient(&mut self) -> io::Result<()> {
        let id = self.read_number("Enter Patient ID to discharge: ")?;

        // Checked before asking for a date so an already discharged patient is told at once.
        let name = match self.registry.find_by_id(id) {
            Ok(patient) if patient.status.is_discharged() => Err(RecordError::AlreadyDischarged {
                id,
                discharge_date: patient.discharge_date.clone(),
            }),
            Ok(patient) => Ok(patient.name.clone()),
            Err(e) => Err(e),
        };
        let name = match name {
            Ok(name) => name,
            Err(e) => return self.report(e),
        };

        let date = self.read_text("Enter discharge date (e.g., 2025-09-21): ")?;
        match self.registry.discharge(id, &date) {
            Ok(()) => writeln!(self.out, "Patient {} has been discharged.", name),
            Err(e) => self.report(e),
        }
    }

    // ------------------------------------------------------------------------
    // Treatment management
    // ------------------------------------------------------------------------

    fn add_treatment(&mut self) -> io::Result<()> {
        let id = self.read_number("Enter Patient ID: ")?;
        let checked = self.registry.find_by_id(id).and_then(|patient| {
            if patient.status.is_discharged() {
                return Err(RecordError::PatientDischarged(id));
            }
            Ok(())
        });
        if let Err(e) = checked {
            return self.report(e);
        }

        let description = self.read_text("Enter treatment description: ")?;
        if description.is_empty() {
            return writeln!(self.out, "Treatment description cannot be empty.");
        }
        match self.registry.add_treatment(id, &description) {
            Ok(()) => writeln!(self.out, "Treatment added."),
            Err(e) => self.report(e),
        }
    }

    fn undo_treatment(&mut self) -> io::Result<()> {
        let id = self.read_number("Enter Patient ID: ")?;
        match self.registry.undo_last_treatment(id) {
            Ok(entry) => writeln!(self.out, "Undo treatment: {}", entry),
            Err(RecordError::NotFound(_) | RecordError::EmptyHistory(_)) => {
                writeln!(self.out, "No treatment to undo.")
            }
            Err(e) => self.report(e),
        }
    }

    fn view_history(&mut self) -> io::Result<()> {
        let id = self.read_number("Enter Patient ID: ")?;
        let lookup: RecordResult<(String, Vec<String>)> =
            self.registry.find_by_id(id).map(|p| {
                let entries = p.treatment_history.iter().map(str::to_owned).collect();
                (p.name.clone(), entries)
            });

        match lookup {
            Ok((name, entries)) if !entries.is_empty() => {
                writeln!(self.out, "Treatment history for {}:", name)?;
                for entry in entries {
                    writeln!(self.out, "- {}", entry)?;
                }
                Ok(())
            }
            Ok(_) | Err(RecordError::NotFound(_)) => writeln!(self.out, "No treatment history."),
            Err(e) => self.report(e),
        }
    }

    // ------------------------------------------------------------------------
    // ER management
    // ------------------------------------------------------------------------

    fn enqueue(&mut self) -> io::Result<()> {
        let name = self.read_text("ER Patient Name: ")?;
        let priority = self.read_number("Priority (1-5, 5=highest): ")?;
        match self.queue.enqueue(&name, priority) {
            Ok(_) => writeln!(self.out, "ER Patient added."),
            Err(e) => self.report(e),
        }
    }

    fn dequeue(&mut self) -> io::Result<()> {
        match self.queue.dequeue() {
            Ok(intake) => writeln!(self.out, "Processing ER Patient: {}", intake.name),
            Err(e) => self.report(e),
        }
    }

    fn display_queue(&mut self) -> io::Result<()> {
        if self.queue.is_empty() {
            return writeln!(self.out, "ER Queue empty.");
        }

        writeln!(self.out, "{:<5}{:<25}{:<10}", "No.", "Name", "Priority")?;
        for (position, intake) in self.queue.list().enumerate() {
            writeln!(
                self.out,
                "{:<5}{:<25}{:<10}",
                position + 1,
                intake.name,
                intake.priority
            )?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Input and error helpers
    // ------------------------------------------------------------------------

    /// Prints a core error the way the menus word it.
    fn report(&mut self, error: RecordError) -> io::Result<()> {
        match error {
            RecordError::NotFound(_) | RecordError::NoMatch(_) => {
                writeln!(self.out, "Patient not found.")
            }
            RecordError::AlreadyDischarged { discharge_date, .. } => writeln!(
                self.out,
                "Patient is already discharged on {}.",
                discharge_date
            ),
            RecordError::PatientDischarged(_) => writeln!(
                self.out,
                "Cannot add treatment. Patient already discharged."
            ),
            RecordError::EmptyQueue => writeln!(self.out, "ER Queue empty."),
            other => {
                tracing::error!("record operation failed: {}", other);
                writeln!(self.out, "Error: {}", other)
            }
        }
    }

    /// Prompts and reads one line without its line ending.
    fn read_text(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        let trimmed_len = line.trim_end_matches(&['\r', '\n'][..]).len();
        line.truncate(trimmed_len);
        Ok(line)
    }

    /// Prompts until the line parses as a number.
    fn read_number<T: FromStr>(&mut self, prompt: &str) -> io::Result<T> {
        loop {
            let line = self.read_text(prompt)?;
            match line.trim().parse() {
                Ok(value) => return Ok(value),
                Err(_) => writeln!(self.out, "Invalid input. Please enter a number.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;
    use tempfile::TempDir;
    use ward_core::{AdmissionStatus, CoreConfig};

    fn open(data_dir: &Path) -> (PatientRegistry, ErQueue) {
        let cfg =
            CoreConfig::new(data_dir.to_path_buf()).expect("CoreConfig::new should succeed");
        (
            PatientRegistry::open(&cfg).expect("registry should open"),
            ErQueue::open(&cfg).expect("queue should open"),
        )
    }

    /// Runs a scripted session and returns the collections plus everything printed.
    fn session(data_dir: &Path, script: &str) -> (PatientRegistry, ErQueue, String) {
        let (registry, queue) = open(data_dir);
        let mut out = Vec::new();
        let mut console = Console::new(Cursor::new(script.as_bytes()), &mut out, registry, queue);
        console.run().expect("console should run");
        let (registry, queue) = console.into_parts();
        let printed = String::from_utf8(out).expect("output should be UTF-8");
        (registry, queue, printed)
    }

    #[test]
    fn test_exit_option_leaves_console() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, _, printed) = session(temp_dir.path(), "4\n");
        assert!(printed.starts_with("===== Hospital Patient System ====="));
    }

    #[test]
    fn test_end_of_input_leaves_console_mid_prompt() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (registry, _, _) = session(temp_dir.path(), "1\n1\nAlice\n");
        assert!(registry.is_empty(), "an interrupted admission is not saved");
    }

    #[test]
    fn test_add_and_display_patient() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let script = "1\n1\nAlice\n30\nF\nFlu\n2025-01-01\n4\n7\n4\n";
        let (registry, _, printed) = session(temp_dir.path(), script);

        assert!(printed.contains("Patient added with ID: 1"));
        assert!(printed.contains(
            "1    Alice               30   F         Flu                 2025-01-01  N/A         Admitted"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_number_reprompts() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let script = "1\n1\nAlice\nthirty\n30\nF\nFlu\n2025-01-01\n7\n4\n";
        let (registry, _, printed) = session(temp_dir.path(), script);

        assert!(printed.contains("Invalid input. Please enter a number."));
        assert_eq!(registry.find_by_id(1).unwrap().age, 30);
    }

    #[test]
    fn test_treatment_flow_and_discharge_guard() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let script = concat!(
            "1\n1\nAlice\n30\nF\nFlu\n2025-01-01\n",
            "6\n1\n2025-01-05\n",
            "6\n1\n",
            "7\n",
            "2\n1\n1\n",
            "3\n1\n",
            "2\n1\n",
            "2\n1\n",
            "4\n4\n",
        );
        let (registry, _, printed) = session(temp_dir.path(), script);

        assert!(printed.contains("Patient Alice has been discharged."));
        assert!(printed.contains("Patient is already discharged on 2025-01-05."));
        assert!(printed.contains("Cannot add treatment. Patient already discharged."));
        assert!(printed.contains("Treatment history for Alice:\n- Patient discharged on 2025-01-05"));
        assert!(printed.contains("Undo treatment: Patient discharged on 2025-01-05"));
        assert!(printed.contains("No treatment to undo."));

        let alice = registry.find_by_id(1).unwrap();
        assert_eq!(alice.status, AdmissionStatus::Discharged);
        assert!(alice.treatment_history.is_empty());
    }

    #[test]
    fn test_search_reports_matches_and_misses() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let script = concat!(
            "1\n1\nAlice\n30\nF\nFlu\n2025-01-01\n",
            "5\n2\nlic\n",
            "5\n1\n9\n",
            "5\n2\nZed\n",
            "7\n4\n",
        );
        let (_, _, printed) = session(temp_dir.path(), script);

        assert!(printed.contains("Found: Alice, ID: 1, Status: Admitted"));
        assert!(printed.contains("Enter ID: Patient not found."));
        assert!(printed.contains("Enter name or part: No patient matches."));
    }

    #[test]
    fn test_empty_treatment_description_is_refused() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let script = concat!(
            "1\n1\nAlice\n30\nF\nFlu\n2025-01-01\n7\n",
            "2\n1\n1\n\n",
            "4\n4\n",
        );
        let (registry, _, printed) = session(temp_dir.path(), script);

        assert!(printed.contains("Treatment description cannot be empty."));
        assert!(registry.find_by_id(1).unwrap().treatment_history.is_empty());
    }

    #[test]
    fn test_er_queue_is_first_come_first_served() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let script = "3\n1\nA\n1\n1\nB\n5\n3\n2\n4\n4\n";
        let (_, queue, printed) = session(temp_dir.path(), script);

        assert!(printed.contains("1    A                        1"));
        assert!(printed.contains("2    B                        5"));
        assert!(printed.contains("Processing ER Patient: A"));
        let remaining: Vec<&str> = queue.list().map(|i| i.name.as_str()).collect();
        assert_eq!(remaining, vec!["B"]);
    }

    #[test]
    fn test_dequeue_empty_queue() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let (_, _, printed) = session(temp_dir.path(), "3\n2\n4\n4\n");
        assert!(printed.contains("ER Queue empty."));
    }

    #[test]
    fn test_session_changes_are_on_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        session(temp_dir.path(), "1\n1\nAlice\n30\nF\nFlu\n2025-01-01\n7\n3\n1\nA\n2\n4\n4\n");

        let (registry, queue) = open(temp_dir.path());
        assert_eq!(registry.find_by_id(1).unwrap().name, "Alice");
        assert_eq!(queue.list().next().map(|i| i.id), Some(1000));
    }
}
