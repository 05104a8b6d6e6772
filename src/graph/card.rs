use super::GraphNode;
use itertools::Itertools;

/// Formats graph nodes the way the canvas card shows them.
pub struct NodeCardFormatter;

impl NodeCardFormatter {
    /// Header line, action line, then one `key: value` line per configured field.
    pub fn format_card(node: &GraphNode) -> String {
        let mut lines = vec![Self::format_header(node), format!("  {}", node.action)];
        lines.extend(
            node.config
                .iter()
                .map(|(key, value)| format!("    {}: {}", key, value)),
        );
        lines.join("\n")
    }

    /// `[node_3] Slack (#4A154B)`; the color is left out when the type has none.
    pub fn format_header(node: &GraphNode) -> String {
        match &node.node_type.color {
            Some(color) => format!("[{}] {} ({})", node.id, node.label, color),
            None => format!("[{}] {}", node.id, node.label),
        }
    }

    /// A compact one-line summary: `node_0 Slack/send message {channel=general}`.
    pub fn format_inline(node: &GraphNode) -> String {
        if node.config.is_empty() {
            return format!("{} {}/{}", node.id, node.label, node.action);
        }
        let config = node
            .config
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .join(", ");
        format!("{} {}/{} {{{}}}", node.id, node.label, node.action, config)
    }
}
