//! Demo `programmers` resource
//!
//! An in-memory collection exercising every route into the problem pipeline:
//! unresolved path parameters, malformed bodies, validation failures,
//! native-status conflicts, unknown failures and panics.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use apikit::api::prelude::*;
use apikit::api::validation_failed;
use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::get,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Programmer {
    pub nickname: String,
    pub avatar_number: u8,
    pub tag_line: Option<String>,
    pub power_level: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgrammer {
    #[serde(default)]
    pub nickname: String,
    pub avatar_number: Option<u8>,
    pub tag_line: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProgrammerList<'a> {
    programmers: Vec<&'a Programmer>,
}

/// Shared in-memory store.
#[derive(Clone, Default)]
pub struct ProgrammerStore {
    inner: Arc<RwLock<BTreeMap<String, Programmer>>>,
}

impl ProgrammerStore {
    #[must_use]
    pub fn get(&self, nickname: &str) -> Option<Programmer> {
        self.inner.read().get(nickname).cloned()
    }

    /// Insert unless the nickname is taken; returns whether it was inserted.
    #[must_use]
    pub fn insert(&self, programmer: Programmer) -> bool {
        let mut guard = self.inner.write();
        if guard.contains_key(&programmer.nickname) {
            return false;
        }
        guard.insert(programmer.nickname.clone(), programmer);
        true
    }

    #[must_use]
    pub fn remove(&self, nickname: &str) -> Option<Programmer> {
        self.inner.write().remove(nickname)
    }
}

const MAX_AVATAR_NUMBER: u8 = 6;

#[must_use]
pub fn router(store: ProgrammerStore) -> Router {
    Router::new()
        .route("/programmers", get(list).post(create))
        .route("/programmers/{nickname}", get(show).delete(remove))
        .route("/_demo/unknown", get(unknown_failure))
        .route("/_demo/panic", get(panicking))
        .with_state(store)
}

async fn list(State(store): State<ProgrammerStore>) -> Response {
    let guard = store.inner.read();
    ok_json(&ProgrammerList {
        programmers: guard.values().collect(),
    })
}

async fn show(
    State(store): State<ProgrammerStore>,
    Path(nickname): Path<String>,
) -> ApiResult<Response> {
    let programmer = store
        .get(&nickname)
        .ok_or_else(unresolved_param::<Programmer>)?;
    Ok(ok_json(&programmer))
}

async fn create(
    State(store): State<ProgrammerStore>,
    ApiJson(new): ApiJson<NewProgrammer>,
) -> ApiResult<Response> {
    let programmer = validate(new)?;

    let location = format!("/api/programmers/{}", programmer.nickname);
    if !store.insert(programmer.clone()) {
        return Err(Failure::native(
            StatusCode::CONFLICT,
            format!("Programmer '{}' already exists", programmer.nickname),
        ));
    }

    tracing::info!(nickname = %programmer.nickname, "Programmer created");
    Ok(created_json(&programmer, &location))
}

async fn remove(
    State(store): State<ProgrammerStore>,
    Path(nickname): Path<String>,
) -> ApiResult<StatusCode> {
    store
        .remove(&nickname)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(unresolved_param::<Programmer>)
}

async fn unknown_failure() -> ApiResult<Response> {
    Err(anyhow!("upstream battle service unreachable").into())
}

async fn panicking() -> &'static str {
    panic!("programmer power level overflowed")
}

fn validate(new: NewProgrammer) -> Result<Programmer, ProblemDetail> {
    let mut errors = Vec::new();
    let nickname = new.nickname.trim().to_owned();
    if nickname.is_empty() {
        errors.push(("nickname", "Please enter a clever nickname"));
    }
    let avatar_number = new.avatar_number.unwrap_or(1);
    if !(1..=MAX_AVATAR_NUMBER).contains(&avatar_number) {
        errors.push(("avatarNumber", "Please pick an avatar between 1 and 6"));
    }
    if !errors.is_empty() {
        return Err(validation_failed(errors));
    }

    Ok(Programmer {
        power_level: power_level_for(&nickname),
        nickname,
        avatar_number,
        tag_line: new.tag_line,
    })
}

/// Deterministic starting power level in 0..=10.
fn power_level_for(nickname: &str) -> u32 {
    nickname
        .bytes()
        .fold(0_u32, |acc, b| acc.wrapping_add(u32::from(b)))
        % 11
}
