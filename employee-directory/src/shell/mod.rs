//! Interactive menu shell
//!
//! Reads from any [`BufRead`] and writes to any [`Write`], so sessions can
//! be scripted. Errors from an operation are printed and the menu comes
//! back; only end of input or a failing terminal ends the loop.

mod prompts;

use std::io::{self, BufRead, Write};

use shared::models::{EmployeeCreate, EmployeeUpdate, Role, UserCreate};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::services::{ExportOutcome, SearchRequest};
use crate::utils::AppError;
use crate::utils::validation::parse_id;
use prompts::{parse_column, parse_optional_number};

const MAIN_MENU: &str = "
Employee Directory
1. Add New Employee
2. Search Employees
3. Update Employee Information
4. Delete Employee
5. Import Employees from CSV
6. Export Employees to CSV
7. Backup Database
8. Manage Users
9. Link Employee to User
10. Logout
0. Exit";

const USER_MENU: &str = "
User Management
1. Register User
2. Delete User
3. List Users by Role
0. Back";

#[derive(Debug, thiserror::Error)]
enum ShellError {
    #[error("end of input")]
    Eof,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    App(#[from] AppError),
}

type ShellResult<T> = Result<T, ShellError>;

/// What the menu loop does after a choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Logout,
    Exit,
}

/// Interactive session over an input and an output stream
pub struct Shell<R, W> {
    state: AppState,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(state: AppState, input: R, output: W) -> Self {
        Self {
            state,
            input,
            output,
        }
    }

    /// Log in, run the menu, repeat after logout; returns at end of input
    /// or on `Exit`.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let user = match self.login().await {
                Ok(user) => user,
                Err(ShellError::Eof) => break,
                Err(ShellError::Io(e)) => return Err(e.into()),
                Err(ShellError::App(e)) => return Err(e.into()),
            };
            writeln!(self.output, "Welcome, {user}.")?;

            if self.session(&user).await? == Flow::Exit {
                break;
            }
            writeln!(self.output, "Logged out.")?;
        }
        writeln!(self.output, "Goodbye!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Give back the output stream (scripted sessions read it afterwards)
    pub fn into_output(self) -> W {
        self.output
    }

    async fn login(&mut self) -> ShellResult<CurrentUser> {
        loop {
            let username = self.prompt("Username: ")?;
            let secret = self.prompt("Password: ")?;
            match self.state.login(&username, &secret).await? {
                Some(user) => return Ok(user),
                None => writeln!(
                    self.output,
                    "{}.",
                    AppError::invalid_credentials().user_message()
                )?,
            }
        }
    }

    async fn session(&mut self, user: &CurrentUser) -> io::Result<Flow> {
        loop {
            writeln!(self.output, "{MAIN_MENU}")?;
            let choice = match self.prompt("Enter your choice: ") {
                Ok(choice) => choice,
                Err(ShellError::Io(e)) => return Err(e),
                Err(_) => return Ok(Flow::Exit),
            };

            let result = match choice.as_str() {
                "1" => self.add_employee(user).await,
                "2" => self.search_employees(user).await,
                "3" => self.update_employee(user).await,
                "4" => self.delete_employee(user).await,
                "5" => self.import_csv(user).await,
                "6" => self.export_csv(user).await,
                "7" => self.backup(user).await,
                "8" => self.manage_users(user).await,
                "9" => self.link_employee(user).await,
                "10" => return Ok(Flow::Logout),
                "0" => return Ok(Flow::Exit),
                _ => {
                    writeln!(self.output, "Invalid choice. Please enter a valid option.")?;
                    continue;
                }
            };

            match self.settle(result)? {
                Flow::Continue => {}
                other => return Ok(other),
            }
        }
    }

    /// Print an operation's error and decide whether to keep going
    fn settle(&mut self, result: ShellResult<()>) -> io::Result<Flow> {
        match result {
            Ok(()) => Ok(Flow::Continue),
            Err(ShellError::App(e)) => {
                tracing::debug!(
                    code = %e.code,
                    category = e.code.category().name(),
                    error = %e,
                    "Operation failed"
                );
                writeln!(self.output, "Error: {}", e.user_message())?;
                Ok(Flow::Continue)
            }
            Err(ShellError::Eof) => Ok(Flow::Exit),
            Err(ShellError::Io(e)) => Err(e),
        }
    }

    async fn add_employee(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let name = self.prompt("Enter employee name: ")?;
        let department = self.prompt("Enter employee department: ")?;
        let position = self.prompt("Enter employee position: ")?;
        let contact = self.prompt("Enter employee contact details: ")?;
        let job_history = self.prompt("Enter employee job history: ")?;
        let skills = self.prompt("Enter employee skills: ")?;

        let data = EmployeeCreate::new(
            name,
            department,
            position,
            Some(contact),
            Some(job_history),
            Some(skills),
        );
        let employee = self.state.employees().add(user, data).await?;
        writeln!(self.output, "Employee added successfully! (ID {})", employee.id)?;
        Ok(())
    }

    async fn search_employees(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let criteria = self.prompt("Enter search criteria: ")?;
        let sort_by = parse_column(&self.prompt("Sort by column (blank for none): ")?)?;
        let filter_column = parse_column(&self.prompt("Filter column (blank for none): ")?)?;

        let mut request = SearchRequest::new(criteria);
        request.sort_by = sort_by;
        if let Some(column) = filter_column {
            let value = self.prompt("Filter value: ")?;
            request.filter = Some((column, value));
        }
        request.per_page = parse_optional_number(&self.prompt("Results per page [10]: ")?)?;
        request.page = parse_optional_number(&self.prompt("Page [1]: ")?)?;

        let results = self.state.employees().search(user, &request).await?;
        if results.is_empty() {
            writeln!(self.output, "No matching employees found.")?;
        } else {
            writeln!(self.output, "\nSearch Results:")?;
            for employee in &results {
                writeln!(self.output, "{employee}")?;
            }
        }
        Ok(())
    }

    async fn update_employee(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let id = parse_id(&self.prompt("Enter employee ID to update: ")?)?;
        let service = self.state.employees();
        let current = service.get(user, id).await?;
        writeln!(
            self.output,
            "Current: {current}\n(blank keeps the current value, '-' clears an optional field)"
        )?;

        let mut data = EmployeeUpdate::from(&current);
        data.name = self.prompt_keep("name", data.name)?;
        data.department = self.prompt_keep("department", data.department)?;
        data.position = self.prompt_keep("position", data.position)?;
        data.contact = self.prompt_optional("contact details", data.contact)?;
        data.job_history = self.prompt_optional("job history", data.job_history)?;
        data.skills = self.prompt_optional("skills", data.skills)?;

        service.update(user, id, data).await?;
        writeln!(self.output, "Employee information updated successfully!")?;
        Ok(())
    }

    async fn delete_employee(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let id = parse_id(&self.prompt("Enter employee ID to delete: ")?)?;
        match self.state.employees().delete(user, id).await? {
            0 => writeln!(self.output, "No employee with ID {id}; nothing deleted.")?,
            _ => writeln!(self.output, "Employee deleted successfully!")?,
        }
        Ok(())
    }

    async fn import_csv(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let path = self.prompt("Enter CSV file path to import: ")?;
        let count = self.state.employees().import_csv(user, &path).await?;
        writeln!(self.output, "Imported {count} employee(s).")?;
        Ok(())
    }

    async fn export_csv(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let path = self.prompt("Enter CSV file path to export to: ")?;
        match self.state.employees().export_csv(user, &path).await? {
            ExportOutcome::Written(count) => {
                writeln!(self.output, "Exported {count} employee(s) to {path}.")?
            }
            ExportOutcome::NothingToExport => writeln!(self.output, "Nothing to export.")?,
        }
        Ok(())
    }

    async fn backup(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let default_dir = self.state.config.backup_dir.clone();
        let answer = self.prompt(&format!(
            "Enter backup directory [{}]: ",
            default_dir.display()
        ))?;
        let target = if answer.is_empty() {
            default_dir
        } else {
            answer.into()
        };
        let path = self.state.backups().backup(user, &target).await?;
        writeln!(self.output, "Backup created: {}", path.display())?;
        Ok(())
    }

    async fn link_employee(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let employee_id = parse_id(&self.prompt("Enter employee ID: ")?)?;
        let answer = self.prompt("Enter user ID to link (blank to unlink): ")?;
        let owner = if answer.is_empty() {
            None
        } else {
            Some(parse_id(&answer)?)
        };
        self.state
            .employees()
            .assign_owner(user, employee_id, owner)
            .await?;
        writeln!(self.output, "Employee link updated.")?;
        Ok(())
    }

    async fn manage_users(&mut self, user: &CurrentUser) -> ShellResult<()> {
        loop {
            writeln!(self.output, "{USER_MENU}")?;
            let result = match self.prompt("Enter your choice: ")?.as_str() {
                "1" => self.register_user(user).await,
                "2" => self.delete_user(user).await,
                "3" => self.list_users(user).await,
                "0" => return Ok(()),
                _ => {
                    writeln!(self.output, "Invalid choice. Please enter a valid option.")?;
                    continue;
                }
            };
            if self.settle(result)? == Flow::Exit {
                return Err(ShellError::Eof);
            }
        }
    }

    async fn register_user(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let username = self.prompt("Enter new username: ")?;
        let password = self.prompt("Enter password: ")?;
        let role = self.prompt_role("Enter role (admin/user): ")?;
        let created = self
            .state
            .users()
            .register(user, UserCreate { username, password, role })
            .await?;
        writeln!(
            self.output,
            "User '{}' registered (ID {}).",
            created.username, created.id
        )?;
        Ok(())
    }

    async fn delete_user(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let id = parse_id(&self.prompt("Enter user ID to delete: ")?)?;
        match self.state.users().delete_user(user, id).await? {
            0 => writeln!(self.output, "No user with ID {id}; nothing deleted.")?,
            _ => writeln!(self.output, "User deleted successfully!")?,
        }
        Ok(())
    }

    async fn list_users(&mut self, user: &CurrentUser) -> ShellResult<()> {
        let role = self.prompt_role("Enter role to list (admin/user): ")?;
        let users = self.state.users().list_users_by_role(user, role).await?;
        if users.is_empty() {
            writeln!(self.output, "No users with role {role}.")?;
        }
        for u in &users {
            writeln!(self.output, "#{} {} ({})", u.id, u.username, u.role)?;
        }
        Ok(())
    }

    // ── Input helpers ───────────────────────────────────────────────

    /// Print `label`, read one line, trimmed
    fn prompt(&mut self, label: &str) -> ShellResult<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ShellError::Eof);
        }
        Ok(line.trim().to_string())
    }

    fn prompt_keep(&mut self, field: &str, current: String) -> ShellResult<String> {
        let answer = self.prompt(&format!("Enter updated employee {field} [{current}]: "))?;
        Ok(if answer.is_empty() { current } else { answer })
    }

    fn prompt_optional(
        &mut self,
        field: &str,
        current: Option<String>,
    ) -> ShellResult<Option<String>> {
        let shown = current.as_deref().unwrap_or("-");
        let answer = self.prompt(&format!("Enter updated employee {field} [{shown}]: "))?;
        Ok(match answer.as_str() {
            "" => current,
            "-" => None,
            _ => Some(answer),
        })
    }

    fn prompt_role(&mut self, label: &str) -> ShellResult<Role> {
        let answer = self.prompt(label)?;
        answer
            .parse::<Role>()
            .map_err(|e| ShellError::App(AppError::invalid_format(e.to_string())))
    }
}
