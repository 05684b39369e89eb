//! Schema steps for the temporal column store.
//!
//! Each step is one SQL file. Pending steps run inside a single
//! transaction, so a store is either fully upgraded or left untouched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "temporal_columns",
        sql: include_str!("0001_temporal_columns.sql"),
    },
    SchemaStep {
        version: 2,
        name: "connector_index",
        sql: include_str!("0002_connector_index.sql"),
    },
];

/// Version range covered by one `apply_migrations` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from: u32,
    pub to: u32,
}

impl SchemaUpgrade {
    pub fn is_noop(self) -> bool {
        self.from == self.to
    }
}

/// Highest schema version this build can create and read.
pub fn latest_schema_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Reads the store's schema version.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Runs every step newer than the store's current version.
///
/// # Errors
/// - `SchemaTooNew` when the store is ahead of this build.
/// - `Sqlite` when a step fails; earlier steps of the same call roll back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<SchemaUpgrade> {
    let found = schema_version(conn)?;
    let supported = latest_schema_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let upgrade = SchemaUpgrade {
        from: found,
        to: supported,
    };
    if upgrade.is_noop() {
        return Ok(upgrade);
    }

    let tx = conn.transaction()?;
    for step in STEPS.iter().filter(|step| step.version > found) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate_step module=db status=ok version={} step={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={}",
        upgrade.from, upgrade.to
    );
    Ok(upgrade)
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_schema_version, schema_version, SchemaUpgrade, STEPS};
    use rusqlite::Connection;

    #[test]
    fn step_versions_start_at_one_and_increase_by_one() {
        for (index, step) in STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "{}", step.name);
        }
        assert_eq!(latest_schema_version() as usize, STEPS.len());
    }

    #[test]
    fn fresh_store_upgrades_once() {
        let mut conn = Connection::open_in_memory().expect("in-memory sqlite");
        let first = apply_migrations(&mut conn).expect("first upgrade");
        assert_eq!(
            first,
            SchemaUpgrade {
                from: 0,
                to: latest_schema_version()
            }
        );
        assert_eq!(schema_version(&conn).expect("version"), latest_schema_version());

        let second = apply_migrations(&mut conn).expect("second upgrade");
        assert!(second.is_noop());
    }

    #[test]
    fn partial_store_runs_only_newer_steps() {
        let mut conn = Connection::open_in_memory().expect("in-memory sqlite");
        conn.execute_batch(STEPS[0].sql).expect("first step");
        conn.pragma_update(None, "user_version", 1u32)
            .expect("set version");

        let upgrade = apply_migrations(&mut conn).expect("upgrade");
        assert_eq!(upgrade.from, 1);
        assert_eq!(upgrade.to, latest_schema_version());
    }
}
