use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::auth::create_account;
use crate::db;
use crate::db::users::NewUser;
use crate::errors::AppResult;
use crate::ui::messages::{detail, muted, success};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;

    match action {
        UserAction::Add {
            email,
            password,
            first_name,
            last_name,
            admin,
            batch,
            semester,
        } => {
            let batch_id = match batch {
                Some(name) => Some(match db::batches::find_batch_by_name(&pool.conn, name)? {
                    Some(b) => b.id,
                    None => {
                        let b = db::batches::insert_batch(&pool.conn, name)?;
                        success(format!("Batch '{}' created", b.name));
                        b.id
                    }
                }),
                None => None,
            };

            let profile = create_account(
                &pool.conn,
                NewUser {
                    email: email.clone(),
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    is_admin: *admin,
                    batch_id,
                    semester_number: *semester,
                    ..NewUser::default()
                },
                password,
            )?;

            success(format!(
                "{} account created: {}",
                if profile.is_admin { "Admin" } else { "Student" },
                profile.email
            ));
            detail("ID", &profile.id);
            if let Some(b) = &profile.batch_name {
                detail("Batch", b);
            }
            if let Some(s) = profile.semester_number {
                detail("Semester", s);
            }
        }

        UserAction::List => {
            let profiles = db::users::list_profiles(&pool.conn)?;
            if profiles.is_empty() {
                muted("No users yet.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("EMAIL", 5),
                Column::new("NAME", 4),
                Column::new("ROLE", 7),
                Column::new("BATCH", 5),
                Column::new("SEM", 3),
            ]);
            for p in &profiles {
                table.add_row(vec![
                    p.email.clone(),
                    p.display_name(),
                    if p.is_admin { "admin" } else { "student" }.to_string(),
                    p.batch_name.clone().unwrap_or_else(|| "--".into()),
                    p.semester_number
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "--".into()),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
