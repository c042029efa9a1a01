//! Common test utilities and helpers

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use accountapi::{Account, AccountAttributes, Client, ClientBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use wiremock::matchers::path_regex;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ACCOUNTS: &str = "/v1/organisation/accounts";
pub const MEDIA_TYPE: &str = "application/vnd.api+json";

/// Deterministic generator for fixtures.
#[allow(dead_code)]
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A random UUID string drawn from `rng`.
#[allow(dead_code)]
pub fn random_id(rng: &mut StdRng) -> String {
    uuid::Builder::from_random_bytes(rng.r#gen())
        .into_uuid()
        .to_string()
}

/// A random two-letter upper case country code.
#[allow(dead_code)]
pub fn random_country(rng: &mut StdRng) -> String {
    (0..2)
        .map(|_| char::from(rng.gen_range(b'A'..=b'Z')))
        .collect()
}

/// A valid account with random ids and country.
#[allow(dead_code)]
pub fn new_account(rng: &mut StdRng) -> Account {
    let country = random_country(rng);
    Account::new(random_id(rng), random_id(rng), country.clone()).with_attributes(
        AccountAttributes::new(country)
            .with_bank_id("400300", "GBDSC")
            .with_bic("NWBKGB22"),
    )
}

/// Builder pointed at `server` with fast retries and no page pacing.
#[allow(dead_code)]
pub fn client_builder(server: &MockServer) -> ClientBuilder {
    Client::builder()
        .base_url(server.uri())
        .timeout(Duration::from_secs(2))
        .retries(1)
        .retry_backoff(Duration::from_millis(10))
        .page_backoff(Duration::ZERO)
}

/// Client pointed at `server` with test defaults.
#[allow(dead_code)]
pub fn client(server: &MockServer) -> Client {
    client_builder(server).build().expect("Failed to build client")
}

/// A JSON:API response with `body`.
#[allow(dead_code)]
pub fn api_response(status: u16, body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_string(), MEDIA_TYPE)
}

/// A single-account response.
#[allow(dead_code)]
pub fn account_response(status: u16, account: &Account) -> ResponseTemplate {
    api_response(
        status,
        json!({
            "data": account,
            "links": { "self": format!("{}/{}", ACCOUNTS, account.id) }
        }),
    )
}

/// One page of a list response, with an optional `next` link.
#[allow(dead_code)]
pub fn page_response(accounts: &[Account], next: Option<&str>) -> ResponseTemplate {
    let mut links = json!({ "self": ACCOUNTS });
    if let Some(next) = next {
        links["next"] = json!(next);
    }
    api_response(200, json!({ "data": accounts, "links": links }))
}

/// Number of requests the server has seen for `method`.
#[allow(dead_code)]
pub async fn request_count(server: &MockServer, method: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.method.as_str() == method)
        .count()
}

/// In-memory account store that answers like the real API.
///
/// - `GET` collection pages with `page[number]`/`page[size]` and filters
/// - `GET`, `PATCH`, `DELETE` by id; `DELETE` checks `version`
/// - `POST` rejects duplicate ids with 409
#[derive(Clone, Default)]
pub struct FakeAccountApi {
    store: Arc<Mutex<BTreeMap<String, Account>>>,
}

#[allow(dead_code)]
impl FakeAccountApi {
    /// Mount the fake on `server`.
    pub async fn mount(server: &MockServer) -> Self {
        let fake = Self::default();
        Mock::given(path_regex(r"^/v1/organisation/accounts"))
            .respond_with(fake.clone())
            .mount(server)
            .await;
        fake
    }

    /// Put accounts straight into the store.
    pub fn seed(&self, accounts: impl IntoIterator<Item = Account>) {
        let mut store = self.store.lock().unwrap();
        for account in accounts {
            store.insert(account.id.clone(), account);
        }
    }

    /// Accounts currently stored.
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    fn list(&self, request: &Request) -> ResponseTemplate {
        let query: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let size: usize = query
            .get("page[size]")
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);
        let number: usize = query
            .get("page[number]")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);

        let store = self.store.lock().unwrap();
        let matching: Vec<Account> = store
            .values()
            .filter(|account| {
                query.iter().all(|(key, value)| {
                    match key
                        .strip_prefix("filter[")
                        .and_then(|k| k.strip_suffix(']'))
                    {
                        Some("country") => &account.attributes.country == value,
                        Some("customer_id") => {
                            account.attributes.customer_id.as_deref() == Some(value.as_str())
                        }
                        Some("iban") => account.attributes.iban.as_deref() == Some(value.as_str()),
                        _ => true,
                    }
                })
            })
            .cloned()
            .collect();

        let start = (number * size).min(matching.len());
        let end = (start + size).min(matching.len());
        let next = (end < matching.len()).then(|| {
            let mut url = request.url.clone();
            url.query_pairs_mut()
                .clear()
                .extend_pairs(query.iter().filter(|(k, _)| k.as_str() != "page[number]"))
                .append_pair("page[number]", &(number + 1).to_string());
            format!("{}?{}", url.path(), url.query().unwrap_or_default())
        });

        page_response(&matching[start..end], next.as_deref())
    }

    fn fetch(&self, id: &str) -> ResponseTemplate {
        match self.store.lock().unwrap().get(id) {
            Some(account) => account_response(200, account),
            None => not_found(id),
        }
    }

    fn create(&self, request: &Request) -> ResponseTemplate {
        let Some(mut account) = decode_data(&request.body) else {
            return api_response(400, json!({ "error_message": "invalid body" }));
        };

        let mut store = self.store.lock().unwrap();
        if store.contains_key(&account.id) {
            return api_response(
                409,
                json!({
                    "error_message": "Account cannot be created as it violates a duplicate constraint"
                }),
            );
        }
        account.version = 0;
        store.insert(account.id.clone(), account.clone());
        account_response(201, &account)
    }

    fn update(&self, id: &str, request: &Request) -> ResponseTemplate {
        let Some(update) = decode_data(&request.body) else {
            return api_response(400, json!({ "error_message": "invalid body" }));
        };

        let mut store = self.store.lock().unwrap();
        match store.get_mut(id) {
            Some(account) => {
                account.attributes = update.attributes;
                account.version += 1;
                account_response(200, account)
            }
            None => not_found(id),
        }
    }

    fn delete(&self, id: &str, request: &Request) -> ResponseTemplate {
        let version: Option<u64> = request
            .url
            .query_pairs()
            .find(|(k, _)| k == "version")
            .and_then(|(_, v)| v.parse().ok());

        let mut store = self.store.lock().unwrap();
        let stored = store.get(id).map(|account| account.version);
        match stored {
            None => ResponseTemplate::new(404),
            Some(stored) if Some(stored) != version => {
                api_response(409, json!({ "error_message": "invalid version" }))
            }
            Some(_) => {
                store.remove(id);
                ResponseTemplate::new(204)
            }
        }
    }
}

impl Respond for FakeAccountApi {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let rest = request
            .url
            .path()
            .trim_start_matches(ACCOUNTS)
            .trim_start_matches('/')
            .to_string();

        match (request.method.as_str(), rest.as_str()) {
            ("GET", "") => self.list(request),
            ("POST", "") => self.create(request),
            ("GET", id) => self.fetch(id),
            ("PATCH", id) => self.update(id, request),
            ("DELETE", id) => self.delete(id, request),
            _ => ResponseTemplate::new(405),
        }
    }
}

fn decode_data(body: &[u8]) -> Option<Account> {
    #[derive(serde::Deserialize)]
    struct Envelope {
        data: Account,
    }
    serde_json::from_slice::<Envelope>(body)
        .ok()
        .map(|envelope| envelope.data)
}

fn not_found(id: &str) -> ResponseTemplate {
    api_response(
        404,
        json!({ "error_message": format!("record {} does not exist", id) }),
    )
}
