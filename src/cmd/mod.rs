use anyhow::{anyhow, bail, Result};
use serde_json::Value;

use crate::api::ListResponse;
use crate::error::BridgeError;
use crate::format::{human_bytes, human_time};
use crate::message::{BridgeRequest, DomainList, ReplyEnvelope};

pub async fn serve() -> Result<()> {
    crate::server::serve().await
}

pub async fn send(prompt: &str, model: Option<String>) -> Result<()> {
    if prompt.is_empty() {
        println!("Please enter a prompt.");
        return Ok(());
    }

    let reply = envelope(&BridgeRequest::SendToOllama {
        prompt: Some(prompt.to_string()),
        model,
    })
    .await?;

    if !reply.success {
        bail!(
            "{}. Ensure Ollama is running and accessible.",
            error_text(&reply)
        );
    }

    let text = reply
        .data
        .as_ref()
        .and_then(|d| d.get("response"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("No response received.");
    println!("{}", text);

    Ok(())
}

pub async fn models() -> Result<()> {
    let reply = envelope(&BridgeRequest::FetchModels).await?;
    if !reply.success {
        bail!(
            "{}. Ensure Ollama is running and accessible.",
            error_text(&reply)
        );
    }

    let data = reply.data.ok_or_else(|| anyhow!("missing data in reply"))?;
    let list: ListResponse = serde_json::from_value(data)?;

    println!("\n{:<40} {:<12} {:<12} MODIFIED", "NAME", "ID", "SIZE");
    println!("{}", "-".repeat(80));

    for m in list.models {
        let modified_timestamp = chrono::DateTime::parse_from_rfc3339(&m.modified_at)
            .map(|dt| dt.timestamp())
            .unwrap_or(0);
        let modified = human_time(modified_timestamp, "Never");

        println!(
            "{:<40} {:<12} {:<12} {}",
            m.name,
            &m.digest[..12.min(m.digest.len())],
            human_bytes(m.size),
            modified
        );
    }

    Ok(())
}

pub async fn domains_list() -> Result<()> {
    let value = call(&BridgeRequest::GetDomains).await?;
    let list: DomainList = serde_json::from_value(value)?;

    if list.domains.is_empty() {
        println!("No allowed domains configured");
        return Ok(());
    }

    for domain in list.domains {
        println!("{}", domain);
    }

    Ok(())
}

pub async fn domains_add(pattern: &str) -> Result<()> {
    mutate(&BridgeRequest::AddDomain {
        domain: pattern.to_string(),
    })
    .await?;
    println!("Added '{}'", pattern);

    Ok(())
}

pub async fn domains_add_current(url: &str) -> Result<()> {
    mutate(&BridgeRequest::AddCurrentDomain {
        url: Some(url.to_string()),
    })
    .await?;
    println!("Added origin of '{}'", url);

    Ok(())
}

pub async fn domains_allow_all() -> Result<()> {
    mutate(&BridgeRequest::AllowAllDomains).await?;
    println!("All domains allowed");

    Ok(())
}

pub async fn domains_remove(pattern: &str) -> Result<()> {
    mutate(&BridgeRequest::RemoveDomain {
        domain: pattern.to_string(),
    })
    .await?;
    println!("Removed '{}'", pattern);

    Ok(())
}

async fn call(request: &BridgeRequest) -> Result<Value> {
    let url = format!("http://{}/internal", crate::envconfig::bridge_addr());
    let response = reqwest::Client::new()
        .post(&url)
        .json(request)
        .send()
        .await
        .map_err(|_| BridgeError::NoResponse)?;

    Ok(response.json().await.map_err(|_| BridgeError::NoResponse)?)
}

async fn envelope(request: &BridgeRequest) -> Result<ReplyEnvelope> {
    Ok(serde_json::from_value(call(request).await?)?)
}

async fn mutate(request: &BridgeRequest) -> Result<()> {
    let reply = envelope(request).await?;
    if reply.success {
        Ok(())
    } else {
        bail!("{}", error_text(&reply))
    }
}

fn error_text(reply: &ReplyEnvelope) -> String {
    reply
        .error
        .clone()
        .unwrap_or_else(|| "unknown error".to_string())
}
