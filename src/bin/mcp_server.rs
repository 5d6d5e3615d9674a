//! Team Analyzer MCP Server
//!
//! A Model Context Protocol server using the official Rust SDK (rmcp) that
//! exposes team parsing and analysis as tools for LLM interaction.

use std::borrow::Cow;
use std::path::Path;
use std::sync::Arc;

use poke_analyzer::analysis::TeamAnalyzer;
use poke_analyzer::mcp_interface::*;
use poke_analyzer::providers::{DexData, PokedexProvider, ResponseCache, UsageSnapshot};
use poke_analyzer::{parse_team, PokemonType};
use std::time::Duration;
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, *},
    schemars, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::Deserialize;
use tokio::io::{stdin, stdout};

/// Format analyzed when a request does not name one. A surface default; the
/// analysis core itself never assumes a format.
const DEFAULT_FORMAT: &str = "gen9vgc2025regh";

#[derive(Clone)]
pub struct TeamAnalyzerService {
    tool_router: ToolRouter<TeamAnalyzerService>,
    analyzer: Arc<TeamAnalyzer<DexData, UsageSnapshot>>,
    dex: Arc<DexData>,
}

// Tool request structures
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseTeamRequest {
    #[schemars(description = "Smogon-format team export text")]
    pub team_text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeTeamRequest {
    #[schemars(description = "Smogon-format team export text")]
    pub team_text: String,
    #[schemars(description = "Competitive format slug (e.g. gen9vgc2025regh)")]
    pub format: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LookupSpeciesRequest {
    #[schemars(description = "Name of the Pokemon species to look up")]
    pub species_name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TypeMatchupRequest {
    #[schemars(description = "Attacking type name (e.g. Ground)")]
    pub attacking_type: String,
    #[schemars(description = "Defending type names, 1 or 2 entries")]
    pub defending_types: Vec<String>,
}

#[tool_router]
impl TeamAnalyzerService {
    pub fn new(dex: Arc<DexData>, usage: Arc<UsageSnapshot>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            analyzer: Arc::new(TeamAnalyzer::new(Arc::clone(&dex), usage)),
            dex,
        }
    }

    #[tool(description = "Parse Smogon-format team text and echo the parsed roster")]
    async fn parse_team(
        &self,
        Parameters(request): Parameters<ParseTeamRequest>,
    ) -> Result<CallToolResult, McpError> {
        match parse_team(&request.team_text) {
            Ok(roster) => Ok(CallToolResult::success(vec![Content::text(render_roster(
                &roster,
            ))])),
            Err(e) => Err(invalid_request(format!("Error parsing team: {}", e))),
        }
    }

    #[tool(
        description = "Analyze a Smogon-format team: type coverage, metagame threats, insights and recommendations"
    )]
    async fn analyze_team(
        &self,
        Parameters(request): Parameters<AnalyzeTeamRequest>,
    ) -> Result<CallToolResult, McpError> {
        let roster = parse_team(&request.team_text)
            .map_err(|e| invalid_request(format!("Error parsing team: {}", e)))?;
        let format = request.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        match self.analyzer.analyze(&roster, format).await {
            Ok(report) => Ok(CallToolResult::success(vec![Content::text(render_report(
                &report,
            ))])),
            Err(e) => Err(invalid_request(format!("Error analyzing team: {}", e))),
        }
    }

    #[tool(description = "Look up a Pokemon species: typing, base stats and abilities")]
    async fn lookup_species(
        &self,
        Parameters(request): Parameters<LookupSpeciesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = match self.dex.species(&request.species_name).await.found() {
            Some(profile) => render_species(&profile),
            None => format!("No data found for '{}'.", request.species_name),
        };
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Compute the type effectiveness multiplier of an attack into a defender")]
    async fn type_matchup(
        &self,
        Parameters(request): Parameters<TypeMatchupRequest>,
    ) -> Result<CallToolResult, McpError> {
        let attacking = request
            .attacking_type
            .parse::<PokemonType>()
            .map_err(|_| invalid_request(format!("Unknown type '{}'", request.attacking_type)))?;
        let mut defending = Vec::new();
        for name in &request.defending_types {
            let parsed = name
                .parse::<PokemonType>()
                .map_err(|_| invalid_request(format!("Unknown type '{}'", name)))?;
            defending.push(parsed);
        }
        if defending.is_empty() || defending.len() > 2 {
            return Err(invalid_request(
                "Provide 1 or 2 defending types".to_string(),
            ));
        }
        Ok(CallToolResult::success(vec![Content::text(render_matchup(
            attacking, &defending,
        ))]))
    }

    #[tool(description = "Compute level-50 speed tiers for a Smogon-format team")]
    async fn team_speed_tiers(
        &self,
        Parameters(request): Parameters<AnalyzeTeamRequest>,
    ) -> Result<CallToolResult, McpError> {
        let roster = parse_team(&request.team_text)
            .map_err(|e| invalid_request(format!("Error parsing team: {}", e)))?;
        let format = request.format.as_deref().unwrap_or(DEFAULT_FORMAT);
        let report = self
            .analyzer
            .analyze(&roster, format)
            .await
            .map_err(|e| invalid_request(format!("Error analyzing team: {}", e)))?;

        let mut text = String::from("Speed tiers (level 50):\n");
        for tier in &report.speed_tiers {
            match tier.effective_speed {
                Some(speed) => {
                    text.push_str(&format!("  {}: {}", tier.member, speed));
                    if let Some(tailwind) = tier.tailwind_speed {
                        text.push_str(&format!(" ({} under Tailwind)", tailwind));
                    }
                    if !tier.priority_moves.is_empty() {
                        text.push_str(&format!(
                            "; priority: {}",
                            tier.priority_moves.join(", ")
                        ));
                    }
                    text.push('\n');
                }
                None => text.push_str(&format!("  {}: unknown base speed\n", tier.member)),
            }
        }
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }
}

fn invalid_request(message: String) -> McpError {
    McpError {
        code: ErrorCode(-32602),
        message: Cow::from(message),
        data: None,
    }
}

#[tool_handler]
impl ServerHandler for TeamAnalyzerService {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Team Analyzer MCP Server starting...");

    let data_path = Path::new("data");
    let dex = Arc::new(DexData::load(data_path)?);
    let lookup_cache = ResponseCache::new(256, Duration::from_secs(900));
    let usage = match UsageSnapshot::load_dir(&data_path.join("usage")) {
        Ok(snapshot) => Arc::new(snapshot.with_cache(lookup_cache)),
        Err(e) => {
            // Analysis still runs without usage data; the report flags it.
            eprintln!("Usage snapshots unavailable: {}", e);
            Arc::new(UsageSnapshot::empty())
        }
    };

    let service = TeamAnalyzerService::new(dex, usage);
    let transport = (stdin(), stdout());

    eprintln!("Starting MCP server with transport...");
    let server = service.serve(transport).await?;

    let quit_reason = server.waiting().await?;
    eprintln!("Team Analyzer MCP Server exiting: {:?}", quit_reason);
    Ok(())
}
