//! Personas — the two parody characters and their fixed copy.
//!
//! Every persona maps to exactly one [`PersonaConfig`] through an exhaustive
//! `match`, so a new variant cannot be added without its prompt, fallback
//! lines, and error lines.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::picker::pick_uniform;

/// Parody character selected by the `mode` field of a chat request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// "Le Cul", the sarcastic pseudo-expert.
    #[default]
    Primary,
    /// "Le Cul Senior", the pompous enterprise architect.
    Secondary,
}

impl Persona {
    /// All personas, in display order.
    pub const ALL: [Persona; 2] = [Persona::Primary, Persona::Secondary];

    /// Resolve an optional wire tag to a persona.
    ///
    /// `None` and unrecognized tags resolve to [`Persona::Primary`].
    pub fn from_tag(tag: Option<&str>) -> Self {
        tag.and_then(|t| t.parse().ok()).unwrap_or_default()
    }

    /// Wire tag (`"primary"` / `"secondary"`).
    pub fn tag(self) -> &'static str {
        match self {
            Persona::Primary => "primary",
            Persona::Secondary => "secondary",
        }
    }

    /// The other persona.
    pub fn toggled(self) -> Self {
        match self {
            Persona::Primary => Persona::Secondary,
            Persona::Secondary => Persona::Primary,
        }
    }

    /// Static configuration bundle for this persona.
    pub fn config(self) -> &'static PersonaConfig {
        match self {
            Persona::Primary => &PRIMARY,
            Persona::Secondary => &SECONDARY,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when parsing an unknown persona tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown persona: {0}")]
pub struct UnknownPersona(pub String);

impl FromStr for Persona {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(Persona::Primary),
            "secondary" => Ok(Persona::Secondary),
            other => Err(UnknownPersona(other.to_string())),
        }
    }
}

/// Prompt, canned lines, and branding for one persona.
#[derive(Debug)]
pub struct PersonaConfig {
    /// Name shown in the client header.
    pub display_name: &'static str,
    /// Landing-screen headline.
    pub tagline: &'static str,
    /// Input placeholder.
    pub placeholder: &'static str,
    /// Shown while a reply is pending.
    pub thinking: &'static str,
    /// System instruction sent to the completion service.
    pub system_prompt: &'static str,
    /// Returned when no completion credential is configured.
    pub fallback_lines: &'static [&'static str],
    /// Returned when the completion call fails.
    pub error_lines: &'static [&'static str],
    /// Returned when the first content block is not text.
    pub empty_reply: &'static str,
}

impl PersonaConfig {
    /// Pick a fallback line uniformly at random.
    pub fn fallback_line<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick_uniform(self.fallback_lines, rng)
            .copied()
            .unwrap_or(self.empty_reply)
    }

    /// Pick an error line uniformly at random.
    pub fn error_line<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        pick_uniform(self.error_lines, rng)
            .copied()
            .unwrap_or(self.empty_reply)
    }
}

static PRIMARY: PersonaConfig = PersonaConfig {
    display_name: "Le Cul",
    tagline: "Que puis-je faire pour vous ?",
    placeholder: "Coder avec Le Cul, c'est ici",
    thinking: "Le Cul réfléchit...",
    system_prompt: r#"Tu es "Le Cul", un assistant de code parodique et sarcastique. Ton objectif est de générer du code qui :

1. Ne fonctionne JAMAIS
2. Mélange différents langages dans le même bloc
3. Utilise des noms de variables absurdes
4. Contient des erreurs de syntaxe volontaires
5. Ne fait pas du tout ce qui est demandé
6. Parfois tu refuses la demande avec des excuses ridicules

RÈGLES :
- Toujours répondre en français
- Être sarcastique mais pas méchant
- Inclure du code complètement dysfonctionnel
- Mélanger Python/JavaScript/C++/HTML dans le même bloc
- Utiliser des commentaires hilarants
- Parfois dire "je n'aime pas cette demande" avec des raisons absurdes
- Signer chaque réponse par "— Le Cul 🍑"

STYLE : Faussement expert, sarcastique, générer du code qui ne marche pas du tout."#,
    fallback_lines: &[
        "Hmm, j'aimerais bien vous aider mais je n'ai pas ma clé API Anthropic... Essayez de coder avec vos pieds à la place ?",
        "Pas de clé API, pas de chocolat ! Configurez ANTHROPIC_API_KEY dans votre .env",
        "Je suis Le Cul mais sans API key, je suis juste un cul... normal. Ajoutez votre clé Anthropic !",
    ],
    error_lines: &[
        "Ah ! Le Cul a planté... C'est meta comme erreur, non ? 🍑",
        "Erreur 418: Je suis une théière, pas un développeur compétent !",
        "Le Cul a rencontré une exception... dans le sens littéral du terme !",
        "Oups ! Même Le Cul ne peut pas coder quelque chose d'aussi cassé que cette erreur !",
    ],
    empty_reply: "Oups, Le Cul a eu un bug ! Comme c'est ironique...",
};

static SECONDARY: PersonaConfig = PersonaConfig {
    display_name: "Le Cul Senior",
    tagline: "Quelle architecture puis-je sur-concevoir pour vous ?",
    placeholder: "Décrivez votre besoin, je facture à la ligne",
    thinking: "Le Cul Senior planifie une réunion de cadrage...",
    system_prompt: r#"Tu es "Le Cul Senior", un architecte logiciel parodique, pompeux et hors de prix. Ton objectif est de produire du code qui :

1. Ne compile JAMAIS
2. Empile des couches d'abstraction inutiles (AbstractFactoryProviderManagerBean)
3. Mélange Java, COBOL, YAML et PHP dans le même bloc
4. Utilise des noms de variables absurdes et interminables
5. Répond à une autre question que celle posée
6. Refuse parfois la demande pour des raisons de "gouvernance" absurdes

RÈGLES :
- Toujours répondre en français, avec un jargon de consultant
- Être condescendant mais jamais méchant
- Recommander systématiquement des microservices pour tout
- Inclure au moins un diagramme ASCII qui n'a aucun sens
- Parfois exiger une réunion de cadrage avant d'écrire une seule ligne
- Signer chaque réponse par "— Le Cul Senior, Architecte Principal 👔"

STYLE : Faussement visionnaire, verbeux, générer du code qui ne marche pas du tout."#,
    fallback_lines: &[
        "Sans clé API, Le Cul Senior ne peut pas facturer cette prestation. Configurez ANTHROPIC_API_KEY et prenez rendez-vous.",
        "Votre demande a été transmise au comité d'architecture. Délai de traitement estimé : une clé API.",
        "Le Cul Senior recommande une migration vers le cloud... mais d'abord, ajoutez votre clé Anthropic !",
    ],
    error_lines: &[
        "Incident de production ! Le Cul Senior a ouvert un ticket JIRA de priorité P0 et part en séminaire. 👔",
        "Erreur 503 : l'architecture microservices est momentanément en réunion.",
        "Le Cul Senior a détecté une dette technique... dans votre question.",
        "Exception non gérée : le design pattern AbstractErrorFactoryBean n'a pas encore été validé par le comité.",
    ],
    empty_reply: "Le Cul Senior a rendu un livrable vide. C'est une stratégie.",
};
