//! Cliente da API do Supervisor (`GET /info` com bearer token).
//!
//! Sem retry aqui dentro: a própria cadência de poll do loop já repete a
//! consulta a cada intervalo.

use oled_core::source::StatusSource;
use oled_core::types::ha_state;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

/// Falhas ao consultar o Supervisor.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Token do Supervisor ausente")]
    NoAuth,

    #[error("Falha HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resposta não é JSON válido: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Formato inesperado: {0} não é um objeto")]
    Shape(&'static str),

    #[error("Cliente HTTP indisponível: {0}")]
    ClientUnavailable(String),
}

/// Primeiro valor não-vazio entre as variáveis, em ordem de prioridade.
pub fn resolve_token<F>(names: &[String], lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// [`resolve_token`] sobre o ambiente do processo.
pub fn token_from_env(names: &[String]) -> Option<String> {
    resolve_token(names, |name| std::env::var(name).ok())
}

/// Extrai `data.state` do corpo.
///
/// Raiz e `data` precisam ser objetos; `data` ou `state` ausentes viram
/// `"unknown"`.
fn parse_state(body: &str) -> Result<String, FetchError> {
    let root: Value = serde_json::from_str(body)?;
    let root = root.as_object().ok_or(FetchError::Shape("corpo"))?;

    let Some(data) = root.get("data") else {
        return Ok(ha_state::UNKNOWN.to_string());
    };
    let data = data.as_object().ok_or(FetchError::Shape("data"))?;

    let state = match data.get("state") {
        None | Some(Value::Null) => ha_state::UNKNOWN.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    Ok(state)
}

pub struct SupervisorClient {
    /// `Err` guarda o motivo quando o cliente não pôde ser criado
    http: Result<reqwest::blocking::Client, String>,
    url: String,
    token: Option<String>,
}

impl SupervisorClient {
    /// Cria o cliente. Se o HTTP não puder ser montado, o erro é logado e
    /// toda consulta passa a devolver `"error"`; o processo segue rodando.
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                error!("Não foi possível criar o cliente HTTP: {e}");
                e.to_string()
            });
        Self {
            http,
            url: url.into(),
            token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Consulta o estado sem degradar; usado por [`StatusSource::fetch_state`].
    pub fn try_fetch_state(&self) -> Result<String, FetchError> {
        let token = self.token.as_deref().ok_or(FetchError::NoAuth)?;
        let http = self
            .http
            .as_ref()
            .map_err(|reason| FetchError::ClientUnavailable(reason.clone()))?;

        let body = http
            .get(&self.url)
            .bearer_auth(token)
            .send()?
            .error_for_status()?
            .text()?;

        parse_state(&body)
    }
}

impl StatusSource for SupervisorClient {
    fn fetch_state(&mut self) -> String {
        match self.try_fetch_state() {
            Ok(state) => state,
            Err(FetchError::NoAuth) => {
                debug!("Sem token do Supervisor, pulando consulta");
                ha_state::NO_AUTH.to_string()
            }
            Err(e) => {
                error!("Erro ao ler o status do Supervisor: {e}");
                ha_state::ERROR.to_string()
            }
        }
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
