//! Static catalog of interview categories
//!
//! A read-only lookup table; the session engine treats categories as plain
//! strings and never depends on this module.

use once_cell::sync::Lazy;
use serde::Serialize;

/// One professional category a candidate can practice for
#[derive(Debug, Clone, Serialize)]
pub struct CategoryConfig {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Focus areas, folded into the generated questions' framing
    pub context: &'static str,
}

static CATEGORIES: Lazy<Vec<CategoryConfig>> = Lazy::new(|| {
    vec![
        CategoryConfig {
            id: "software-engineering",
            name: "Software Engineering",
            description: "Technical interviews for software development roles",
            context: "Focus on algorithms, data structures, system design, and coding practices",
        },
        CategoryConfig {
            id: "data-science",
            name: "Data Science",
            description: "Interviews for data science and machine learning positions",
            context: "Focus on statistical analysis, machine learning, data visualization, and model evaluation",
        },
        CategoryConfig {
            id: "product-management",
            name: "Product Management",
            description: "Product manager role interviews",
            context: "Focus on product strategy, roadmapping, stakeholder management, and user research",
        },
        CategoryConfig {
            id: "marketing",
            name: "Marketing",
            description: "Marketing and growth role interviews",
            context: "Focus on marketing strategy, campaign management, analytics, and brand development",
        },
        CategoryConfig {
            id: "sales",
            name: "Sales",
            description: "Sales and business development interviews",
            context: "Focus on sales techniques, relationship building, negotiation, and closing deals",
        },
        CategoryConfig {
            id: "finance",
            name: "Finance",
            description: "Financial analyst and accounting role interviews",
            context: "Focus on financial modeling, analysis, reporting, and investment strategies",
        },
        CategoryConfig {
            id: "consulting",
            name: "Consulting",
            description: "Management and strategy consulting interviews",
            context: "Focus on case studies, problem-solving, business strategy, and client management",
        },
        CategoryConfig {
            id: "design",
            name: "UX/UI Design",
            description: "User experience and interface design interviews",
            context: "Focus on design thinking, user research, prototyping, and visual design",
        },
        CategoryConfig {
            id: "hr",
            name: "Human Resources",
            description: "HR and talent management interviews",
            context: "Focus on recruitment, employee relations, performance management, and organizational development",
        },
        CategoryConfig {
            id: "operations",
            name: "Operations",
            description: "Operations and supply chain management interviews",
            context: "Focus on process optimization, logistics, quality control, and efficiency",
        },
        CategoryConfig {
            id: "customer-success",
            name: "Customer Success",
            description: "Customer success and support role interviews",
            context: "Focus on customer relationships, retention, onboarding, and satisfaction",
        },
        CategoryConfig {
            id: "project-management",
            name: "Project Management",
            description: "Project and program management interviews",
            context: "Focus on planning, execution, risk management, and team coordination",
        },
        CategoryConfig {
            id: "legal",
            name: "Legal",
            description: "Legal and compliance role interviews",
            context: "Focus on legal analysis, contract review, compliance, and risk assessment",
        },
        CategoryConfig {
            id: "healthcare",
            name: "Healthcare",
            description: "Healthcare and medical profession interviews",
            context: "Focus on patient care, medical knowledge, clinical decision-making, and healthcare systems",
        },
        CategoryConfig {
            id: "education",
            name: "Education",
            description: "Teaching and educational role interviews",
            context: "Focus on pedagogy, curriculum development, student engagement, and assessment",
        },
        CategoryConfig {
            id: "research",
            name: "Research",
            description: "Academic and industry research position interviews",
            context: "Focus on research methodology, experimental design, analysis, and publication",
        },
        CategoryConfig {
            id: "executive",
            name: "Executive Leadership",
            description: "C-level and senior leadership interviews",
            context: "Focus on strategic vision, organizational leadership, change management, and decision-making",
        },
        CategoryConfig {
            id: "entrepreneurship",
            name: "Entrepreneurship",
            description: "Startup founder and entrepreneur interviews",
            context: "Focus on business models, fundraising, growth strategies, and innovation",
        },
        CategoryConfig {
            id: "cybersecurity",
            name: "Cybersecurity",
            description: "Information security and cybersecurity interviews",
            context: "Focus on security architecture, threat analysis, incident response, and compliance",
        },
        CategoryConfig {
            id: "devops",
            name: "DevOps/SRE",
            description: "DevOps and Site Reliability Engineering interviews",
            context: "Focus on infrastructure, automation, monitoring, and reliability",
        },
    ]
});

/// All categories, in catalog order
pub fn all() -> &'static [CategoryConfig] {
    &CATEGORIES
}

/// Look up a category by its id
pub fn find(id: &str) -> Option<&'static CategoryConfig> {
    CATEGORIES.iter().find(|category| category.id == id)
}

pub fn is_valid(id: &str) -> bool {
    find(id).is_some()
}
