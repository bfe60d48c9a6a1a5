use super::graph::KnowledgeGraph;
use super::store::GraphStore;
use crate::domain::{Entity, Relationship};
use crate::error::{KgError, Result};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "http://localhost:7474";
const DEFAULT_DATABASE: &str = "neo4j";
const DEFAULT_USER_AGENT: &str = "satgraph/0.1";
const DEFAULT_BATCH_SIZE: usize = 500;

/// One result row of a pass-through query, keyed by column name.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub base_url: String,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
    pub batch_size: usize,
}

impl Neo4jConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            database: DEFAULT_DATABASE.to_string(),
            user: None,
            password: None,
            timeout: Duration::from_secs(60),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    fn transaction_url(&self) -> String {
        format!("{}/db/{}/tx", self.base_url, self.database)
    }
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// A Cypher statement with its parameters, as sent to the transactional endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub statement: String,
    pub parameters: Map<String, Value>,
}

impl Statement {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            parameters: Map::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.parameters.insert(key.to_string(), value.into());
        self
    }
}

pub fn clear_statement() -> Statement {
    Statement::new("MATCH (n) DETACH DELETE n")
}

pub fn entity_statement(entity: &Entity) -> Statement {
    let mut properties = store_properties(&entity.properties.extra);
    properties.insert(
        "created_from".to_string(),
        Value::String(entity.properties.created_from.clone()),
    );
    Statement::new(
        "CREATE (n:Entity {id: $id, label: $label, type: $type, name: $name}) SET n += $properties",
    )
    .param("id", entity.id.to_string())
    .param("label", entity.label.clone())
    .param("type", entity.kind.as_str())
    .param("name", entity.name())
    .param("properties", Value::Object(properties))
}

/// The edge type is written into the statement text; [`crate::domain::RelationType`]
/// only ever holds `[A-Z0-9_]`, and it is backtick-quoted on top of that.
pub fn relationship_statement(relationship: &Relationship) -> Statement {
    let mut properties = store_properties(&relationship.properties.extra);
    properties.insert(
        "source_text".to_string(),
        Value::String(relationship.properties.source_text.clone()),
    );
    Statement::new(format!(
        "MATCH (a:Entity {{id: $source_id}}) MATCH (b:Entity {{id: $target_id}}) \
         CREATE (a)-[r:`{}` {{id: $id, confidence: $confidence}}]->(b) SET r += $properties",
        relationship.kind
    ))
    .param("source_id", relationship.source_id.to_string())
    .param("target_id", relationship.target_id.to_string())
    .param("id", relationship.id.to_string())
    .param("confidence", relationship.properties.confidence)
    .param("properties", Value::Object(properties))
}

/// Neo4j properties hold primitives or homogeneous primitive lists only; other
/// values are stored as their JSON text and nulls are left out.
fn store_properties(extra: &BTreeMap<String, Value>) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), store_value(value)))
        .collect()
}

fn store_value(value: &Value) -> Value {
    match value {
        Value::Array(items) if is_homogeneous_primitive_list(items) => value.clone(),
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        primitive => primitive.clone(),
    }
}

fn is_homogeneous_primitive_list(items: &[Value]) -> bool {
    let kind = |value: &Value| match value {
        Value::Bool(_) => Some(0),
        Value::Number(_) => Some(1),
        Value::String(_) => Some(2),
        _ => None,
    };
    let Some(first) = items.first().map(kind) else {
        return true;
    };
    first.is_some() && items.iter().all(|item| kind(item) == first)
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    commit: Option<String>,
    #[serde(default)]
    results: Vec<StatementResult>,
    #[serde(default)]
    errors: Vec<ServerError>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<RowData>,
}

#[derive(Debug, Deserialize)]
struct RowData {
    #[serde(default)]
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    code: String,
    message: String,
}

impl TxResponse {
    fn into_checked(self) -> Result<Self> {
        if let Some(error) = self.errors.first() {
            return Err(KgError::Store {
                code: error.code.clone(),
                message: error.message.clone(),
            });
        }
        Ok(self)
    }
}

impl StatementResult {
    fn into_records(self) -> Vec<Record> {
        let columns = self.columns;
        self.data
            .into_iter()
            .map(|data| columns.iter().cloned().zip(data.row).collect())
            .collect()
    }
}

/// Graph store backed by the Neo4j HTTP transactional Cypher endpoint.
pub struct Neo4jStore {
    client: HttpClient,
    config: Neo4jConfig,
}

impl Neo4jStore {
    pub fn new(config: Neo4jConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );
        let client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(KgError::StoreUnavailable)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Neo4jConfig {
        &self.config
    }

    /// Runs a raw Cypher statement in its own auto-committed transaction.
    ///
    /// The statement is passed through untouched: only trusted callers should
    /// reach this.
    pub fn query(&self, statement: &str, parameters: Map<String, Value>) -> Result<Vec<Record>> {
        let statement = Statement {
            statement: statement.to_string(),
            parameters,
        };
        let body = json!({ "statements": [statement] });
        let url = format!("{}/commit", self.config.transaction_url());
        let response = self.send(self.client.post(&url).json(&body))?;
        let parsed = response.into_checked()?;
        Ok(parsed
            .results
            .into_iter()
            .next()
            .map(StatementResult::into_records)
            .unwrap_or_default())
    }

    fn begin(&self) -> Result<Transaction<'_>> {
        let body = json!({ "statements": [] });
        let response = self.send(self.client.post(self.config.transaction_url()).json(&body))?;
        let parsed = response.into_checked()?;
        let commit_url = parsed.commit.ok_or_else(|| KgError::Store {
            code: "satgraph.MissingCommitUrl".to_string(),
            message: "transaction opened without a commit URL".to_string(),
        })?;
        let url = commit_url
            .strip_suffix("/commit")
            .unwrap_or(&commit_url)
            .to_string();
        debug!(%url, "transaction opened");
        Ok(Transaction {
            store: self,
            url,
            commit_url,
            finished: false,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.user {
            Some(user) => request.basic_auth(user, self.config.password.as_deref()),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<TxResponse> {
        let response = self
            .authorize(request)
            .send()
            .map_err(KgError::StoreUnavailable)?;
        parse_response(response)
    }
}

fn parse_response(response: Response) -> Result<TxResponse> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().unwrap_or_default();
        return Err(KgError::Store {
            code: format!("http.{}", status.as_u16()),
            message,
        });
    }
    response.json().map_err(KgError::StoreUnavailable)
}

/// Open server-side transaction; rolled back on drop unless committed.
struct Transaction<'a> {
    store: &'a Neo4jStore,
    url: String,
    commit_url: String,
    finished: bool,
}

impl Transaction<'_> {
    fn run(&self, statements: &[Statement]) -> Result<()> {
        let body = json!({ "statements": statements });
        self.store
            .send(self.store.client.post(&self.url).json(&body))?
            .into_checked()?;
        Ok(())
    }

    /// On failure the guard is still armed, so dropping it rolls back.
    fn commit(mut self) -> Result<()> {
        let body = json!({ "statements": [] });
        self.store
            .send(self.store.client.post(&self.commit_url).json(&body))?
            .into_checked()?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let request = self.store.authorize(self.store.client.delete(&self.url));
        if let Err(err) = request.send() {
            warn!(url = %self.url, error = %err, "transaction rollback failed");
        } else {
            debug!(url = %self.url, "transaction rolled back");
        }
    }
}

/// Requests sent by one `save`, in order: the clear on its own, then node
/// creates followed by edge creates in chunks of at most `batch_size`.
fn save_batches(graph: &KnowledgeGraph, batch_size: usize) -> Vec<Vec<Statement>> {
    let statements: Vec<Statement> = graph
        .entities()
        .map(entity_statement)
        .chain(graph.relationships().map(relationship_statement))
        .collect();
    std::iter::once(vec![clear_statement()])
        .chain(statements.chunks(batch_size.max(1)).map(<[Statement]>::to_vec))
        .collect()
}

impl GraphStore for Neo4jStore {
    fn save(&self, graph: &KnowledgeGraph) -> Result<()> {
        let started = Instant::now();
        let tx = self.begin()?;
        for batch in save_batches(graph, self.config.batch_size) {
            tx.run(&batch)?;
        }
        tx.commit()?;

        info!(
            database = %self.config.database,
            entities = graph.node_count(),
            relationships = graph.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "graph saved to neo4j"
        );
        Ok(())
    }

    fn close(self) -> Result<()> {
        debug!(base_url = %self.config.base_url, "neo4j store closed");
        Ok(())
    }
}
