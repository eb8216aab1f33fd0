use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        batch,
        semester,
        force,
    } = cmd
    {
        let pool = open_db(cfg)?;
        ExportLogic::export(
            &pool.conn,
            format.as_str(),
            file,
            batch.as_deref(),
            *semester,
            *force,
        )?;
    }
    Ok(())
}
