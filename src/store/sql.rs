use super::PredictionStore;
use crate::{
    Error, Result,
    prediction::{
        Prediction, PredictionId, PredictionPatch, UnsavedPrediction, format_timestamp,
        parse_timestamp,
    },
};
use async_trait::async_trait;
use libsql::{Builder, Connection, Database, Row, Value};
use tokio::sync::RwLock;
use tracing::debug;

const COLUMNS: &str = "id, img_url, predictor, predicted_label, human_answer, created_at, updated_at";

/// libSQL-backed store.
///
/// A single connection is shared behind an async read-write lock. Lookups and
/// listings share it, while id assignment and read-modify-write updates hold
/// it exclusively so they never interleave.
pub struct SqlPredictionStore {
    _db: Database,
    conn: RwLock<Connection>,
}

impl SqlPredictionStore {
    pub async fn open(db_path: &str) -> Result<Self> {
        let db = Builder::new_local(db_path).build().await?;
        let conn = db.connect()?;

        // AUTOINCREMENT keeps ids from being reused after deletes.
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                img_url TEXT NOT NULL,
                predictor TEXT NOT NULL,
                predicted_label TEXT NOT NULL,
                human_answer TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            (),
        )
        .await?;

        Ok(Self {
            _db: db,
            conn: RwLock::new(conn),
        })
    }

    async fn select_one(conn: &Connection, id: PredictionId) -> Result<Prediction> {
        let mut rows = conn
            .query(
                &format!("SELECT {COLUMNS} FROM predictions WHERE id = ?"),
                [id.value()],
            )
            .await?;

        match rows.next().await? {
            Some(row) => row_to_prediction(&row),
            None => Err(Error::PredictionNotFound { id }),
        }
    }
}

fn row_to_prediction(row: &Row) -> Result<Prediction> {
    let human_answer = match row.get_value(4)? {
        Value::Null => None,
        Value::Text(text) => Some(text),
        other => {
            return Err(Error::internal(format!(
                "Unexpected human_answer column value: {other:?}"
            )));
        }
    };
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Prediction {
        id: PredictionId::new(row.get(0)?),
        img_url: row.get(1)?,
        predictor: row.get(2)?,
        predicted_label: row.get(3)?,
        human_answer,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}

fn optional_text(value: &Option<String>) -> Value {
    match value {
        Some(text) => Value::Text(text.clone()),
        None => Value::Null,
    }
}

#[async_trait]
impl PredictionStore for SqlPredictionStore {
    async fn insert(&self, prediction: UnsavedPrediction) -> Result<PredictionId> {
        let conn = self.conn.write().await;
        let timestamp = format_timestamp(&prediction.created_at);
        conn.execute(
            "INSERT INTO predictions (img_url, predictor, predicted_label, human_answer, created_at, updated_at) VALUES (?, ?, ?, NULL, ?, ?)",
            (
                prediction.img_url.as_str(),
                prediction.predictor.as_str(),
                prediction.predicted_label.as_str(),
                timestamp.as_str(),
                timestamp.as_str(),
            ),
        )
        .await?;

        let id = PredictionId::new(conn.last_insert_rowid());
        debug!("Prediction {} saved to database", id);
        Ok(id)
    }

    async fn find_by_id(&self, id: PredictionId) -> Result<Prediction> {
        let conn = self.conn.read().await;
        Self::select_one(&conn, id).await
    }

    async fn list_all(&self) -> Result<Vec<Prediction>> {
        let conn = self.conn.read().await;
        let mut rows = conn
            .query(
                &format!("SELECT {COLUMNS} FROM predictions ORDER BY id DESC"),
                (),
            )
            .await?;

        let mut predictions = Vec::new();
        while let Some(row) = rows.next().await? {
            predictions.push(row_to_prediction(&row)?);
        }

        debug!("Retrieved {} predictions from database", predictions.len());
        Ok(predictions)
    }

    async fn update_fields(&self, id: PredictionId, patch: PredictionPatch) -> Result<Prediction> {
        let conn = self.conn.write().await;
        let mut prediction = Self::select_one(&conn, id).await?;
        patch.apply(&mut prediction);

        conn.execute(
            "UPDATE predictions SET human_answer = ?, updated_at = ? WHERE id = ?",
            (
                optional_text(&prediction.human_answer),
                format_timestamp(&prediction.updated_at),
                id.value(),
            ),
        )
        .await?;

        debug!("Prediction {} updated in database", id);
        Ok(prediction)
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.write().await;
        let removed = conn.execute("DELETE FROM predictions", ()).await?;
        debug!("Cleared {} predictions from database", removed);
        Ok(())
    }
}
