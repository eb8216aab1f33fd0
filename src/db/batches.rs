use crate::db::{conflict_on_unique, new_id, timestamp_now};
use crate::errors::{AppError, AppResult};
use crate::models::Batch;
use rusqlite::{Connection, OptionalExtension, Row, params};

const DUPLICATE_NAME: &str = "A batch with this name already exists";

fn map_batch(row: &Row) -> rusqlite::Result<Batch> {
    Ok(Batch {
        id: row.get("id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

pub fn list_batches(conn: &Connection) -> AppResult<Vec<Batch>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM batches ORDER BY name ASC")?;
    let rows = stmt.query_map([], map_batch)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_batch(conn: &Connection, id: &str) -> AppResult<Option<Batch>> {
    Ok(conn
        .query_row(
            "SELECT id, name, created_at FROM batches WHERE id = ?1",
            [id],
            map_batch,
        )
        .optional()?)
}

pub fn find_batch_by_name(conn: &Connection, name: &str) -> AppResult<Option<Batch>> {
    Ok(conn
        .query_row(
            "SELECT id, name, created_at FROM batches WHERE name = ?1",
            [name.trim()],
            map_batch,
        )
        .optional()?)
}

fn checked_name(name: &str) -> AppResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Batch name is required"));
    }
    Ok(name)
}

pub fn insert_batch(conn: &Connection, name: &str) -> AppResult<Batch> {
    let name = checked_name(name)?;
    let batch = Batch {
        id: new_id(),
        name: name.to_string(),
        created_at: timestamp_now(),
    };

    conn.execute(
        "INSERT INTO batches (id, name, created_at) VALUES (?1, ?2, ?3)",
        params![batch.id, batch.name, batch.created_at],
    )
    .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;

    Ok(batch)
}

pub fn rename_batch(conn: &Connection, id: &str, name: &str) -> AppResult<Batch> {
    let name = checked_name(name)?;
    let changed = conn
        .execute("UPDATE batches SET name = ?1 WHERE id = ?2", params![name, id])
        .map_err(|e| conflict_on_unique(e, DUPLICATE_NAME))?;
    if changed == 0 {
        return Err(AppError::NotFound("Batch".into()));
    }
    get_batch(conn, id)?.ok_or_else(|| AppError::NotFound("Batch".into()))
}

/// Subjects, timetables and questions of the batch go with it.
pub fn delete_batch(conn: &Connection, id: &str) -> AppResult<()> {
    if conn.execute("DELETE FROM batches WHERE id = ?1", [id])? == 0 {
        return Err(AppError::NotFound("Batch".into()));
    }
    Ok(())
}
