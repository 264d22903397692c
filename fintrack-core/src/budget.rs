//! 50/30/20 budget buckets and the category tables that feed them.

use serde::{Deserialize, Serialize};

pub const ESSENTIAL_CATEGORIES: &[&str] = &[
    "Alimentação",
    "Moradia",
    "Saúde",
    "Transporte",
    "Educação",
    "Contas Básicas",
    "Seguros",
    "Impostos e Taxas",
    "Farmácia",
    "Manutenção do Lar",
    "Vestuário Básico",
    "Outro (Essencial)",
];

pub const LIFESTYLE_CATEGORIES: &[&str] = &[
    "Lazer",
    "Cuidados Pessoais",
    "Compras",
    "Assinaturas",
    "Viagens",
    "Restaurantes",
    "Streaming",
    "Hobbies",
    "Academia/Esportes",
    "Pets",
    "Presentes",
    "Eventos e Festas",
    "Delivery",
    "Beleza e Estética",
    "Outro (Estilo de Vida)",
];

pub const SAVINGS_CATEGORIES: &[&str] = &["Dívidas", "Reserva", "Outro (Poupança)"];

pub const INCOME_CATEGORIES: &[&str] = &[
    "Salário",
    "Renda Extra",
    "Aposentadoria / Investimentos",
    "Outros",
];

/// Budget bucket of the 50/30/20 rule. Serialized with the labels existing
/// data was stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    #[serde(rename = "Essenciais")]
    Essentials,
    #[serde(rename = "Estilo de Vida")]
    Lifestyle,
    #[serde(rename = "Poupança")]
    Savings,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Essentials, Bucket::Lifestyle, Bucket::Savings];

    /// Bucket of a user category; anything not essential or lifestyle is savings.
    pub fn for_category(category: &str) -> Self {
        let category = category.trim();
        if ESSENTIAL_CATEGORIES.contains(&category) {
            Bucket::Essentials
        } else if LIFESTYLE_CATEGORIES.contains(&category) {
            Bucket::Lifestyle
        } else {
            Bucket::Savings
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Bucket::Essentials => "Essenciais",
            Bucket::Lifestyle => "Estilo de Vida",
            Bucket::Savings => "Poupança",
        }
    }

    /// Parse a stored label. Older rows say "Poupança/Dívidas".
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        match label {
            "Essenciais" => Some(Bucket::Essentials),
            "Estilo de Vida" => Some(Bucket::Lifestyle),
            _ if label.contains("Poupança") => Some(Bucket::Savings),
            _ => None,
        }
    }

    /// Target share of spending, 0.0 - 1.0
    pub fn target_share(&self) -> f64 {
        match self {
            Bucket::Essentials => 0.5,
            Bucket::Lifestyle => 0.3,
            Bucket::Savings => 0.2,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a category name is one the income form offers.
pub fn is_income_category(category: &str) -> bool {
    INCOME_CATEGORIES.contains(&category.trim())
}
