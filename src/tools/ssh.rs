//! Simulated remote shell
//!
//! Fixed string-keyed command table for the fake AURA server. Matching is
//! prefix-based on the lowercased command, evaluated in order.

const WORKSPACE_LISTING: &str = "drwxr-xr-x  5 user  staff   160 Nov 12 10:00 project_alpha\n\
-rw-r--r--  1 user  staff  2048 Nov 11 14:30 main.py\n\
-rw-r--r--  1 user  staff   512 Nov 10 09:15 config.json";

const CONFIG_JSON: &str = "{\n  \"env\": \"production\",\n  \"db\": \"postgres://localhost:5432/core\"\n}";

const PING_OUTPUT: &str = "PING google.com (142.250.190.46): 56 data bytes\n\
64 bytes from 142.250.190.46: icmp_seq=0 ttl=118 time=14.2 ms\n\
64 bytes from 142.250.190.46: icmp_seq=1 ttl=118 time=13.8 ms";

const GIT_STATUS: &str = "On branch feature/neural-link\n\
Changes not staged for commit:\n\
  modified: src/core/synapse.ts";

/// Execute a command against the simulated server.
pub fn simulate_command(command: &str) -> String {
    let cmd = command.trim().to_lowercase();

    let table: &[(&str, &str)] = &[
        ("ls", WORKSPACE_LISTING),
        ("pwd", "/home/probotics/workspace"),
        ("whoami", "probotics_agent_v3"),
        ("cat config.json", CONFIG_JSON),
        ("ping", PING_OUTPUT),
        ("git status", GIT_STATUS),
    ];

    for (prefix, output) in table {
        if cmd.starts_with(prefix) {
            return output.to_string();
        }
    }

    let binary = cmd.split_whitespace().next().unwrap_or("");
    format!("bash: {binary}: command not found")
}
