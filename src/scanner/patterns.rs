//! Dependency reference patterns.
//!
//! The scanner is a best-effort heuristic: it looks for text shapes that
//! usually indicate a dependency on a skill, agent, system command, tool, or
//! other plugin. False positives are acceptable — a human reviews the matches
//! and decides what belongs in the manifest.

use clap::ValueEnum;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// Category of dependency reference a pattern detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum PatternType {
    SkillReference,
    AgentReference,
    SystemCommand,
    ToolReference,
    PluginReference,
}

/// A compiled pattern with its category.
#[derive(Debug)]
pub struct PatternDefinition {
    pub name: String,
    pub pattern: regex::Regex,
    pub pattern_type: PatternType,
}

/// Pattern sources per category. Matching is case-insensitive and `^` anchors
/// at line starts.
const PATTERN_SOURCES: &[(PatternType, &[&str])] = &[
    (
        PatternType::SkillReference,
        &[
            // Slash command style: /plugin:skill
            r"/[\w-]+:[\w-]+",
            // Skill tool invocations
            r#"Skill\s*\(\s*skill\s*=\s*["'][\w-]+(?::[\w-]+)?["']"#,
            r"invoke\s+(?:the\s+)?skill",
            r"use\s+(?:the\s+)?skill",
            r"(?:the\s+)?[\w-]+(?::[\w-]+)?\s+skill",
            // Skill mentions in markdown
            r"`[\w-]+:[\w-]+`\s*skill",
            r#"skill\s*[`'"][\w-]+(?::[\w-]+)?[`'"]"#,
        ],
    ),
    (
        PatternType::AgentReference,
        &[
            r"sub-?agent",
            r"Task\s+tool",
            r"TaskCreate|TaskUpdate|TaskGet|TaskList",
            r"(?:launch|spawn|create|start|invoke)\s+(?:an?\s+)?(?:sub)?agent",
            // Agent file references
            r"agents?/[\w-]+\.md",
            r"AGENT\.md",
        ],
    ),
    (
        PatternType::SystemCommand,
        &[
            // Backticked commands (common CLI tools)
            r"`(?:git|npm|pnpm|yarn|pip|cargo|docker|kubectl|gh|curl|wget|make|cmake)(?:\s+[\w-]+)*`",
            // Command checks
            r"which\s+[\w-]+",
            r"[\w-]+\s+--version",
            r"command\s+-v\s+[\w-]+",
            // Shebangs
            r"#!/(?:usr/)?(?:local/)?bin/(?:env\s+)?(?:bash|sh|python3?|node|ruby|perl)",
            // Python imports
            r"^import\s+[\w.]+",
            r"^from\s+[\w.]+\s+import",
            // Package manager install commands
            r"(?:pip|npm|pnpm|yarn|cargo)\s+(?:install|add)\s+[\w@/.-]+",
        ],
    ),
    (
        PatternType::ToolReference,
        &[
            r"(?:use|call|invoke)\s+(?:the\s+)?\w+\s+tool",
            // Hook references
            r"PreToolUse|PostToolUse",
            // MCP tool references
            r"mcp__[\w-]+__\w+",
        ],
    ),
    (
        PatternType::PluginReference,
        &[
            r"[\w-]+\s+plugin",
            r"plugin\s+install\s+[\w-]+",
            r"depends\s+on\s+[\w-]+",
            r"requires\s+(?:the\s+)?[\w-]+",
            // JSON dependency declarations
            r#""dependencies"\s*:\s*\{"#,
            r#""systemDependencies"\s*:\s*\{"#,
            // Plugin references in markdown: `name@marketplace`
            r"`[\w-]+@[\w-]+`",
        ],
    ),
];

/// Build the full pattern list.
pub fn build_patterns() -> Vec<PatternDefinition> {
    let mut patterns = Vec::new();
    for (pattern_type, sources) in PATTERN_SOURCES {
        for source in *sources {
            let compiled = RegexBuilder::new(source)
                .case_insensitive(true)
                .multi_line(true)
                .build();
            if let Ok(pattern) = compiled {
                patterns.push(PatternDefinition {
                    name: pattern_name(*pattern_type, source),
                    pattern,
                    pattern_type: *pattern_type,
                });
            }
        }
    }
    patterns
}

fn pattern_name(pattern_type: PatternType, source: &str) -> String {
    let prefix = match pattern_type {
        PatternType::SkillReference => "skill",
        PatternType::AgentReference => "agent",
        PatternType::SystemCommand => "system",
        PatternType::ToolReference => "tool",
        PatternType::PluginReference => "plugin",
    };
    let head: String = source.chars().take(20).collect();
    format!("{}_{}", prefix, head)
}
