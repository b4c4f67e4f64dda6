//! Keyword-matching chatbot over the monastery dataset.
//!
//! Matching runs in strict priority order: monastery name, sect, location,
//! festival, general-answer table, fallback. The name rule is deliberately
//! loose (substring either way, or any shared word) and can fire on common
//! words such as "monastery"; the tests pin that behavior rather than
//! tightening it.

use monastery_core::{District, Language, Monastery, Sect};

/// Towns recognized by the location rule.
pub const TOWN_VOCABULARY: [&str; 7] = [
    "gangtok", "pelling", "yuksom", "mangan", "namchi", "ravangla", "geyzing",
];

/// Festival terms recognized by the festival rule.
pub const FESTIVAL_VOCABULARY: [&str; 6] = [
    "losar",
    "bumchu",
    "cham",
    "saga dawa",
    "guru rinpoche",
    "pang lhabsol",
];

/// Canned answers, checked in order; the first trigger contained in the
/// query wins.
pub const GENERAL_ANSWERS: [(&str, &str); 10] = [
    (
        "hello",
        "Hello! How can I help you explore Sikkim's monasteries today?",
    ),
    (
        "hi",
        "Hi there! I'm here to help you discover the sacred monasteries of Sikkim.",
    ),
    (
        "help",
        "I can help you find information about monasteries, sects, festivals, and locations in Sikkim. Just ask me anything!",
    ),
    (
        "how many",
        "There are over 100 monasteries in Sikkim, each with its own unique history and spiritual significance.",
    ),
    (
        "oldest",
        "The oldest monastery in Sikkim is Dubdi Monastery, established in 1701.",
    ),
    (
        "famous",
        "Some of the most famous monasteries include Rumtek, Pemayangtse, Tashiding, and Enchey.",
    ),
    (
        "sects",
        "Sikkim has monasteries from five main Buddhist sects: Nyingma, Kagyu, Sakya, Gelug, and Bon.",
    ),
    (
        "festivals",
        "Monasteries celebrate various festivals like Losar, Bumchu, Cham Dance, and Guru Rinpoche Day.",
    ),
    (
        "visit",
        "Most monasteries are open to visitors from 6 AM to 6 PM. Some may have entry fees.",
    ),
    (
        "audio",
        "Yes! Many monasteries have audio guides available in multiple languages including English, Hindi, and Nepali.",
    ),
];

pub const FALLBACK_ANSWER: &str = "I'm not sure I understand. Could you ask about a specific monastery, sect, festival, or location in Sikkim?";

/// List replies name at most this many monasteries.
pub const LIST_LIMIT: usize = 5;

const GREETINGS_ENGLISH: [&str; 3] = [
    "Namaste! I'm your monastery guide. Ask me about any monastery, sect, festival, or location in Sikkim.",
    "Welcome! I can help you discover Sikkim's monasteries. What would you like to know?",
    "Hello! I'm here to help you explore the sacred monasteries of Sikkim. How can I assist you?",
];

const GREETINGS_HINDI: [&str; 3] = [
    "नमस्ते! मैं आपका मठ गाइड हूं। सिक्किम के किसी भी मठ, संप्रदाय, त्योहार या स्थान के बारे में पूछें।",
    "स्वागत है! मैं आपको सिक्किम के मठों की खोज में मदद कर सकता हूं। आप क्या जानना चाहते हैं?",
    "नमस्कार! मैं यहां सिक्किम के पवित्र मठों का अन्वेषण करने में आपकी मदद के लिए हूं।",
];

const GREETINGS_NEPALI: [&str; 3] = [
    "नमस्ते! म सिक्किमको मठ गाइड हुँ। सिक्किमको कुनै पनि मठ, सम्प्रदाय, चाड वा स्थानको बारेमा सोध्नुहोस्।",
    "स्वागत छ! म तपाईंलाई सिक्किमका मठहरू खोज्न मद्दत गर्न सक्छु। तपाईं के जान्न चाहनुहुन्छ?",
    "नमस्कार! म यहाँ सिक्किमका पवित्र मठहरू अन्वेषण गर्न मद्दत गर्न आएको हुँ।",
];

/// One reply per query. List variants carry both the matched records and
/// the rendered text.
#[derive(Clone, Debug, PartialEq)]
pub enum ChatReply<'a> {
    MonasteryDetail(&'a Monastery),
    SectList {
        matches: Vec<&'a Monastery>,
        text: String,
    },
    LocationList {
        matches: Vec<&'a Monastery>,
        text: String,
    },
    FestivalList {
        matches: Vec<&'a Monastery>,
        text: String,
    },
    General(&'static str),
    Fallback(&'static str),
}

impl ChatReply<'_> {
    /// Rendered message for the chat transcript.
    pub fn render(&self) -> String {
        match self {
            ChatReply::MonasteryDetail(m) => format!(
                "{}\nSect: {}\nLocation: {}\nEstablished: {}\n{}",
                m.name, m.sect, m.district, m.established, m.description
            ),
            ChatReply::SectList { text, .. }
            | ChatReply::LocationList { text, .. }
            | ChatReply::FestivalList { text, .. } => text.clone(),
            ChatReply::General(text) | ChatReply::Fallback(text) => (*text).to_string(),
        }
    }
}

/// The chatbot itself: stateless matching plus a rotating greeting in the
/// active language.
#[derive(Debug)]
pub struct Chatbot {
    language: Language,
    greeting_cursor: usize,
}

impl Default for Chatbot {
    fn default() -> Self {
        Self::new(Language::English)
    }
}

impl Chatbot {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            greeting_cursor: 0,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Switching language restarts the greeting rotation.
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
        self.greeting_cursor = 0;
    }

    /// Next greeting in the active language.
    pub fn greeting(&mut self) -> &'static str {
        let pool = match self.language {
            Language::English => &GREETINGS_ENGLISH,
            Language::Hindi => &GREETINGS_HINDI,
            Language::Nepali => &GREETINGS_NEPALI,
        };
        let greeting = pool[self.greeting_cursor % pool.len()];
        self.greeting_cursor += 1;
        greeting
    }

    /// Match a free-text query against the records, first rule wins.
    pub fn respond<'a>(&self, query: &str, records: &'a [Monastery]) -> ChatReply<'a> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return ChatReply::Fallback(FALLBACK_ANSWER);
        }

        if let Some(monastery) = find_by_name(&query, records) {
            return ChatReply::MonasteryDetail(monastery);
        }

        let sects = matched_sects(&query);
        if !sects.is_empty() {
            let matches: Vec<&Monastery> = records
                .iter()
                .filter(|m| sects.contains(&m.sect))
                .collect();
            if !matches.is_empty() {
                let text = render_list(
                    &format!(
                        "I found {} {} monasteries in Sikkim:",
                        matches.len(),
                        matches[0].sect
                    ),
                    &matches,
                    |m| m.district.name().to_string(),
                );
                return ChatReply::SectList { matches, text };
            }
        }

        let towns = matched_towns(&query);
        let districts = matched_districts(&query);
        if !towns.is_empty() || !districts.is_empty() {
            let matches: Vec<&Monastery> = records
                .iter()
                .filter(|m| {
                    let location = m.location.to_lowercase();
                    towns.iter().any(|t| location.contains(t))
                        || districts.contains(&m.district)
                })
                .collect();
            if !matches.is_empty() {
                let text = render_list(
                    &format!(
                        "I found {} monasteries in {}:",
                        matches.len(),
                        matches[0].district
                    ),
                    &matches,
                    |m| m.sect.name().to_string(),
                );
                return ChatReply::LocationList { matches, text };
            }
        }

        let festivals = matched_festival_terms(&query);
        if !festivals.is_empty() {
            let matches: Vec<&Monastery> = records
                .iter()
                .filter(|m| {
                    m.festivals.iter().any(|f| {
                        let name = f.name.to_lowercase();
                        festivals.iter().any(|term| name.contains(term))
                    })
                })
                .collect();
            if !matches.is_empty() {
                let text = render_list(
                    &format!(
                        "I found {} monasteries that celebrate festivals related to your query:",
                        matches.len()
                    ),
                    &matches,
                    |m| {
                        let names: Vec<&str> = m
                            .festivals
                            .iter()
                            .filter(|f| {
                                let name = f.name.to_lowercase();
                                festivals.iter().any(|term| name.contains(term))
                            })
                            .map(|f| f.name.as_str())
                            .collect();
                        names.join(", ")
                    },
                );
                return ChatReply::FestivalList { matches, text };
            }
        }

        for (trigger, answer) in GENERAL_ANSWERS {
            if query.contains(trigger) {
                return ChatReply::General(answer);
            }
        }

        ChatReply::Fallback(FALLBACK_ANSWER)
    }
}

/// Name rule: the lower-cased name contains the query, or any word of the
/// name appears in the query. First record in input order wins.
fn find_by_name<'a>(query: &str, records: &'a [Monastery]) -> Option<&'a Monastery> {
    records.iter().find(|m| {
        let name = m.name.to_lowercase();
        name.contains(query) || name.split_whitespace().any(|word| query.contains(word))
    })
}

fn matched_sects(query: &str) -> Vec<Sect> {
    Sect::ALL
        .into_iter()
        .filter(|s| query.contains(&s.name().to_lowercase()))
        .collect()
}

fn matched_towns(query: &str) -> Vec<&'static str> {
    TOWN_VOCABULARY
        .into_iter()
        .filter(|t| query.contains(t))
        .collect()
}

fn matched_districts(query: &str) -> Vec<District> {
    District::ALL
        .into_iter()
        .filter(|d| query.contains(&d.name().to_lowercase()))
        .collect()
}

fn matched_festival_terms(query: &str) -> Vec<&'static str> {
    FESTIVAL_VOCABULARY
        .into_iter()
        .filter(|f| query.contains(f))
        .collect()
}

/// "header\n\n1. Name (qualifier)\n...", capped at [`LIST_LIMIT`] entries
/// with a trailing "...and N more." when the list is longer.
fn render_list(
    header: &str,
    matches: &[&Monastery],
    qualifier: impl Fn(&Monastery) -> String,
) -> String {
    let mut text = format!("{header}\n\n");
    for (index, monastery) in matches.iter().take(LIST_LIMIT).enumerate() {
        text.push_str(&format!(
            "{}. {} ({})\n",
            index + 1,
            monastery.name,
            qualifier(monastery)
        ));
    }
    if matches.len() > LIST_LIMIT {
        text.push_str(&format!("\n...and {} more.", matches.len() - LIST_LIMIT));
    }
    text
}
