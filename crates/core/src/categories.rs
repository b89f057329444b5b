//! Static category catalog for the tool directory.
//!
//! Categories are a fixed, code-defined list rather than a database table:
//! tools reference them by slug and the frontend renders the catalog as-is.

use serde::Serialize;

/// One entry in the category catalog.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    /// Stable slug stored in `tools.category`.
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    /// Hex accent color used by the frontend.
    pub color: &'static str,
}

/// The full catalog, in display order.
pub const CATEGORIES: &[Category] = &[
    Category {
        id: "writing",
        name: "Writing",
        description: "AI writing assistants, content generation, and text editing tools",
        icon: "✍️",
        color: "#3B82F6",
    },
    Category {
        id: "image",
        name: "Image",
        description: "AI image generation, editing, and enhancement tools",
        icon: "🎨",
        color: "#10B981",
    },
    Category {
        id: "video",
        name: "Video",
        description: "AI video generation, editing, and post-production tools",
        icon: "🎬",
        color: "#F59E0B",
    },
    Category {
        id: "audio",
        name: "Audio",
        description: "AI speech synthesis, audio editing, and music generation tools",
        icon: "🎵",
        color: "#8B5CF6",
    },
    Category {
        id: "office",
        name: "Office",
        description: "AI office assistants, document processing, and spreadsheet analysis",
        icon: "📊",
        color: "#EF4444",
    },
    Category {
        id: "coding",
        name: "Coding",
        description: "AI code generation, debugging, and refactoring tools",
        icon: "💻",
        color: "#06B6D4",
    },
    Category {
        id: "marketing",
        name: "Marketing",
        description: "AI marketing tools, ad generation, and campaign analytics",
        icon: "📈",
        color: "#84CC16",
    },
    Category {
        id: "education",
        name: "Education",
        description: "AI tutoring assistants, course generation, and Q&A tools",
        icon: "🎓",
        color: "#F97316",
    },
    Category {
        id: "design",
        name: "Design",
        description: "AI design tools, creative generation, and UI/UX helpers",
        icon: "🖌️",
        color: "#EC4899",
    },
    Category {
        id: "business",
        name: "Business",
        description: "AI business analytics, decision support, and market research",
        icon: "💼",
        color: "#6366F1",
    },
    Category {
        id: "health",
        name: "Health",
        description: "AI health assistants and wellness management tools",
        icon: "🏥",
        color: "#14B8A6",
    },
    Category {
        id: "translation",
        name: "Translation",
        description: "AI translation and localization tools",
        icon: "🌐",
        color: "#0EA5E9",
    },
    Category {
        id: "research",
        name: "Research",
        description: "AI literature search, summarization, and analysis tools",
        icon: "🔬",
        color: "#A855F7",
    },
    Category {
        id: "productivity",
        name: "Productivity",
        description: "AI scheduling, note-taking, and personal automation tools",
        icon: "⚡",
        color: "#22C55E",
    },
    Category {
        id: "chatbot",
        name: "Chatbots",
        description: "General-purpose AI chat assistants",
        icon: "💬",
        color: "#64748B",
    },
    Category {
        id: "other",
        name: "Other",
        description: "Tools that do not fit the categories above",
        icon: "🧩",
        color: "#9CA3AF",
    },
];

/// Look up a category by its slug.
pub fn find(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

/// Whether `id` names a known category.
pub fn is_valid(id: &str) -> bool {
    find(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for c in CATEGORIES {
            assert!(seen.insert(c.id), "duplicate category slug: {}", c.id);
        }
    }

    #[test]
    fn find_known_and_unknown() {
        assert!(find("coding").is_some());
        assert!(find("does-not-exist").is_none());
        assert!(is_valid("writing"));
        assert!(!is_valid(""));
    }
}
