use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::repository::{
    entities::Table,
    store::{Error, Result, Store, TokenCell},
};

/// Whose credentials a request is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Reads of published content, always made with the anon key so that they keep working
    /// whatever state the admin session is in
    Public,
    /// Writes, made with the signed-in session's access token
    Admin,
}

/// Client for the PostgREST endpoint of the hosted backend (`{url}/rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    anon_key: String,
    token: TokenCell,
}

impl RestStore {
    pub fn new(base_url: &str, anon_key: &str, token: TokenCell) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            token,
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach the API key and the bearer token. The anon key stands in for the bearer on
    /// public reads and while signed out.
    fn authorize(&self, request: RequestBuilder, access: Access) -> RequestBuilder {
        let bearer = match access {
            Access::Public => None,
            Access::Admin => self.token.get(),
        }
        .unwrap_or_else(|| self.anon_key.clone());

        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, table: Table, request: RequestBuilder, access: Access) -> Result<Response> {
        let response = self
            .authorize(request, access)
            .send()
            .await
            .map_err(|source| Error::Http { table, source })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|err| format!("<unreadable body: {err}>"));

        Err(Error::Status {
            table,
            status: status.as_u16(),
            message,
        })
    }

    async fn rows(&self, table: Table, request: RequestBuilder) -> Result<Vec<Value>> {
        self.send(table, request, Access::Public)
            .await?
            .json::<Vec<Value>>()
            .await
            .map_err(|source| Error::Http { table, source })
    }
}

#[async_trait]
impl Store for RestStore {
    async fn select_ordered(&self, table: Table, order_by: &str) -> Result<Vec<Value>> {
        debug!("Selecting {table} ordered by {order_by}");

        let order = format!("{order_by}.asc");
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("order", order.as_str())]);

        self.rows(table, request).await
    }

    async fn select_single(&self, table: Table) -> Result<Option<Value>> {
        debug!("Selecting single row of {table}");

        // Ask for two so that a second row is detected rather than silently ignored
        let request = self
            .client
            .get(self.table_url(table))
            .query(&[("select", "*"), ("limit", "2")]);

        let mut rows = self.rows(table, request).await?;
        match rows.len() {
            0 | 1 => Ok(rows.pop()),
            count => Err(Error::MultipleRows { table, count }),
        }
    }

    async fn upsert(&self, table: Table, rows: Vec<Value>) -> Result<()> {
        debug!("Upserting {} row(s) into {table}", rows.len());

        let request = self
            .client
            .post(self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows);

        self.send(table, request, Access::Admin).await?;
        Ok(())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<()> {
        debug!("Deleting {id} from {table}");

        let filter = format!("eq.{id}");
        let request = self
            .client
            .delete(self.table_url(table))
            .query(&[("id", filter.as_str())]);

        self.send(table, request, Access::Admin).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let store = RestStore::new("https://example.supabase.co/", "anon", TokenCell::default());

        assert_eq!(
            store.table_url(Table::SocialLinks),
            "https://example.supabase.co/rest/v1/social_links"
        );
    }

    fn bearer(store: &RestStore, access: Access) -> String {
        let request = store
            .authorize(store.client.get(store.table_url(Table::Skills)), access)
            .build()
            .unwrap();

        request
            .headers()
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_reads_never_carry_the_session_token() {
        let token = TokenCell::default();
        let store = RestStore::new("https://example.supabase.co", "anon", token.clone());
        token.set(Some("expired-jwt".into()));

        assert_eq!(bearer(&store, Access::Public), "Bearer anon");
        assert_eq!(bearer(&store, Access::Admin), "Bearer expired-jwt");

        token.set(None);
        assert_eq!(bearer(&store, Access::Admin), "Bearer anon");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_read_failure() {
        // Port 9 (discard) on localhost refuses connections
        let store = RestStore::new("http://127.0.0.1:9", "anon", TokenCell::default());

        assert!(matches!(
            store.select_ordered(Table::Skills, "order_index").await,
            Err(Error::Http {
                table: Table::Skills,
                ..
            })
        ));
    }
}
