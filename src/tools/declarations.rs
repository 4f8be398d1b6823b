//! Tool declarations
//!
//! JSON-schema function declarations offered to the model, selected from
//! the per-module toggles. Names and schemas follow the upstream
//! function-calling contract.

use serde_json::{json, Value};

use crate::config::{AgentConfig, ModuleConfig};

pub const BROWSER_TOOL: &str = "browser_interaction";
pub const MEMORY_TOOL: &str = "memory_system";
pub const CANVAS_TOOL: &str = "render_canvas";
pub const SCRAPE_TOOL: &str = "web_scrape";
pub const CALENDAR_TOOL: &str = "google_calendar";
pub const DRIVE_TOOL: &str = "google_drive";
pub const SSH_TOOL: &str = "aura_ssh_command";
pub const MODEL3D_TOOL: &str = "model_3d";
pub const WEBHOOK_TOOL: &str = "send_to_webhook";
pub const IMAGE_TOOL: &str = "generate_image";

fn browser_declaration() -> Value {
    json!({
        "name": BROWSER_TOOL,
        "description": "Reads the content of a URL. Use for research.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "url": { "type": "STRING", "description": "The target URL." }
            },
            "required": ["url"]
        }
    })
}

fn memory_declaration() -> Value {
    json!({
        "name": MEMORY_TOOL,
        "description": "Updates the User Profile. CALL THIS whenever you learn a new fact about the user.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "category": {
                    "type": "STRING",
                    "enum": ["name", "technicalSkills", "communicationStyle", "personalFacts", "projectContexts", "preferences"],
                    "description": "The category of the information."
                },
                "info": { "type": "STRING", "description": "The specific fact, skill, or preference to store." },
                "action": { "type": "STRING", "enum": ["ADD", "REMOVE", "SET"], "description": "How to modify the profile." }
            },
            "required": ["category", "info", "action"]
        }
    })
}

fn canvas_declaration() -> Value {
    json!({
        "name": CANVAS_TOOL,
        "description": "Renders content to a visual interface (HTML, SVG). Use for charts, diagrams, or single file visualization.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "enum": ["text/html", "image/svg+xml"], "description": "MIME type." },
                "content": { "type": "STRING", "description": "The code to render (HTML or SVG string)." },
                "title": { "type": "STRING", "description": "Title of the visualization." }
            },
            "required": ["type", "content", "title"]
        }
    })
}

fn scrape_declaration() -> Value {
    json!({
        "name": SCRAPE_TOOL,
        "description": "Extracts raw data from a URL without session context. Optimized for speed.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "url": { "type": "STRING" }
            },
            "required": ["url"]
        }
    })
}

fn calendar_declaration() -> Value {
    json!({
        "name": CALENDAR_TOOL,
        "description": "Generates an Intent Link to create a Google Calendar event.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "startDateTime": { "type": "STRING", "description": "ISO 8601 format (YYYYMMDDTHHMMSSZ)" },
                "endDateTime": { "type": "STRING", "description": "ISO 8601 format" },
                "details": { "type": "STRING" },
                "location": { "type": "STRING" }
            },
            "required": ["title", "startDateTime", "endDateTime"]
        }
    })
}

fn drive_declaration() -> Value {
    json!({
        "name": DRIVE_TOOL,
        "description": "Generates a link to create a new Google Doc/Sheet.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "type": { "type": "STRING", "enum": ["document", "spreadsheet", "presentation"] },
                "title": { "type": "STRING" }
            },
            "required": ["type"]
        }
    })
}

fn ssh_declaration() -> Value {
    json!({
        "name": SSH_TOOL,
        "description": "Executes a command on the remote AURA server (Simulated Environment).",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "command": { "type": "STRING" },
                "reasoning": { "type": "STRING", "description": "Why you are running this command." }
            },
            "required": ["command", "reasoning"]
        }
    })
}

fn model3d_declaration() -> Value {
    json!({
        "name": MODEL3D_TOOL,
        "description": "Generates JavaScript code using Three.js to render a 3D scene.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "description": { "type": "STRING", "description": "Description of the scene." },
                "code": { "type": "STRING", "description": "Raw JavaScript code. IMPORTANT: Use \"scene\", \"camera\", \"renderer\" variables. Do NOT create them, assume they exist. Just add objects to \"scene\"." }
            },
            "required": ["description", "code"]
        }
    })
}

fn webhook_declaration() -> Value {
    json!({
        "name": WEBHOOK_TOOL,
        "description": "Sends data to the configured Webhook (n8n/Make). Use this to pass information from the chat to external automation flows.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "data": {
                    "type": "OBJECT",
                    "description": "The JSON payload to send. Structure depends on the user instructions.",
                    "properties": {
                        "action": { "type": "STRING", "description": "Optional action identifier if needed" },
                        "payload": { "type": "STRING", "description": "Content or details" }
                    }
                }
            },
            "required": ["data"]
        }
    })
}

fn image_declaration() -> Value {
    json!({
        "name": IMAGE_TOOL,
        "description": "Generates an image using an AI model. Use when the user asks to \"create\", \"draw\", or \"generate\" a picture.",
        "parameters": {
            "type": "OBJECT",
            "properties": {
                "prompt": { "type": "STRING", "description": "Detailed visual description of the image to generate." }
            },
            "required": ["prompt"]
        }
    })
}

/// Select the declarations enabled by the agent config.
///
/// The webhook tool is offered only when a target URL is configured, even
/// if the module toggle is on.
pub fn declarations_for(config: &AgentConfig) -> Vec<Value> {
    let mods: &ModuleConfig = &config.active_modules;
    let mut declarations = Vec::new();

    if mods.browser {
        declarations.push(browser_declaration());
    }
    if mods.memory {
        declarations.push(memory_declaration());
    }
    if mods.canvas {
        declarations.push(canvas_declaration());
    }
    if mods.scraper {
        declarations.push(scrape_declaration());
    }
    if mods.calendar {
        declarations.push(calendar_declaration());
    }
    if mods.drive {
        declarations.push(drive_declaration());
    }
    if mods.ssh {
        declarations.push(ssh_declaration());
    }
    if mods.model3d {
        declarations.push(model3d_declaration());
    }
    if mods.webhook && config.webhook_config.is_configured() {
        declarations.push(webhook_declaration());
    }
    if mods.image_gen {
        declarations.push(image_declaration());
    }

    declarations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;

    fn names(declarations: &[Value]) -> Vec<String> {
        declarations
            .iter()
            .map(|d| d["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_all_modules_off_yields_no_tools() {
        let config = AgentConfig::default().with_modules(ModuleConfig::none());
        assert!(declarations_for(&config).is_empty());
    }

    #[test]
    fn test_default_modules_exclude_webhook() {
        let config = AgentConfig::default();
        let names = names(&declarations_for(&config));
        assert!(names.contains(&BROWSER_TOOL.to_string()));
        assert!(names.contains(&IMAGE_TOOL.to_string()));
        assert!(!names.contains(&WEBHOOK_TOOL.to_string()));
    }

    #[test]
    fn test_webhook_requires_configured_url() {
        let mut config = AgentConfig::default();
        config.active_modules.webhook = true;
        assert!(!names(&declarations_for(&config)).contains(&WEBHOOK_TOOL.to_string()));

        config.webhook_config = WebhookConfig {
            url: "https://hooks.example/flow".into(),
            description: String::new(),
        };
        assert!(names(&declarations_for(&config)).contains(&WEBHOOK_TOOL.to_string()));
    }

    #[test]
    fn test_declarations_carry_required_params() {
        let config = AgentConfig::default();
        for declaration in declarations_for(&config) {
            assert!(declaration["name"].is_string());
            assert_eq!(declaration["parameters"]["type"], "OBJECT");
        }
    }
}
