use crate::services::excerpt;
use crate::types::{Language, QuestionType};

const JSON_SCHEMA: &str = r#"[
  {
    "type": "multiple_choice",
    "question": "...",
    "options": ["...", "...", "...", "..."],
    "correctAnswer": 0,
    "explanation": "...",
    "difficulty": "easy|medium|hard"
  },
  {
    "type": "free_text",
    "question": "...",
    "modelAnswer": "...",
    "keyWords": ["...", "..."],
    "explanation": "...",
    "difficulty": "easy|medium|hard"
  },
  {
    "type": "fill_in_blank",
    "question": "... _____ ...",
    "answer": "...",
    "alternatives": ["..."],
    "explanation": "...",
    "difficulty": "easy|medium|hard"
  },
  {
    "type": "matching",
    "question": "...",
    "pairs": [
      {"term": "...", "definition": "..."},
      {"term": "...", "definition": "..."}
    ],
    "explanation": "...",
    "difficulty": "easy|medium|hard"
  }
]"#;

struct PromptPhrases {
    role: &'static str,
    schema_intro: &'static str,
    json_only: &'static str,
    topic_label: &'static str,
    context_label: &'static str,
    generate_types: &'static str,
    variants: &'static str,
    requirements: &'static str,
    constraints: [&'static str; 5],
    format: &'static str,
    /// Indexed like [`QuestionType::ALL`].
    type_descriptions: [&'static str; 4],
}

const CS: PromptPhrases = PromptPhrases {
    role: "Jsi expert na tvorbu vzdělávacích testů. Tvým úkolem je vytvářet kvalitní, relevantní \
        a pedagogicky správné testové otázky v češtině.",
    schema_intro: "Vrať odpověď POUZE jako validní JSON pole s touto strukturou:",
    json_only: "Nepiš žádný další text, pouze validní JSON.",
    topic_label: "Hlavní otázka/téma",
    context_label: "Kontext",
    generate_types: "Vygeneruj testové otázky v následujících typech:",
    variants: "Pro každý typ otázky vygeneruj 1-2 kvalitní varianty.",
    requirements: "Požadavky:",
    constraints: [
        "Otázky musí být relevantní k hlavnímu tématu",
        "Odpovědi u výběru z možností musí být věrohodné a náročné",
        "Volné odpovědi musí mít jasná hodnotící kritéria",
        "Doplňovačky musí testovat klíčové pojmy",
        "Přiřazování musí mít logické páry",
    ],
    format: "Vrať odpověď ve formátu JSON podle uvedené struktury.",
    type_descriptions: [
        "Výběr z možností - otázka s jednou správnou a několika špatnými odpověďmi",
        "Volná odpověď - odpověď vlastními slovy s klíčovými pojmy pro hodnocení",
        "Doplňovačka - věta s chybějícími slovy",
        "Přiřazování - pojmy k definicím",
    ],
};

const EN: PromptPhrases = PromptPhrases {
    role: "You are an expert in creating educational tests. Your task is to create high-quality, \
        relevant and pedagogically sound test questions in English.",
    schema_intro: "Return the response ONLY as a valid JSON array with this structure:",
    json_only: "Do not write any additional text, only valid JSON.",
    topic_label: "Main question/topic",
    context_label: "Context",
    generate_types: "Generate test questions of the following types:",
    variants: "Generate 1-2 high-quality variants for each question type.",
    requirements: "Requirements:",
    constraints: [
        "Questions must be relevant to the main topic",
        "Multiple choice distractors must be plausible and challenging",
        "Free text questions must have explicit evaluation criteria",
        "Fill-in-the-blank items must test key concepts",
        "Matching items must form logical pairs",
    ],
    format: "Return the response as JSON following the structure above.",
    type_descriptions: [
        "Multiple Choice - question with one correct and several wrong answers",
        "Free Text - question answered in own words with key terms for evaluation",
        "Fill in the Blank - sentence with missing words",
        "Matching - terms to definitions",
    ],
};

const DE: PromptPhrases = PromptPhrases {
    role: "Sie sind Experte für die Erstellung von Lerntests. Ihre Aufgabe ist es, hochwertige, \
        relevante und pädagogisch korrekte Testfragen auf Deutsch zu erstellen.",
    schema_intro: "Geben Sie die Antwort NUR als gültiges JSON-Array mit folgender Struktur zurück:",
    json_only: "Schreiben Sie keinen weiteren Text, nur gültiges JSON.",
    topic_label: "Hauptfrage/Thema",
    context_label: "Kontext",
    generate_types: "Erstelle Testfragen der folgenden Typen:",
    variants: "Erstelle für jeden Fragetyp 1-2 hochwertige Varianten.",
    requirements: "Anforderungen:",
    constraints: [
        "Die Fragen müssen zum Hauptthema passen",
        "Falsche Antwortoptionen müssen plausibel und anspruchsvoll sein",
        "Freitextfragen brauchen klare Bewertungskriterien",
        "Lückentexte müssen Schlüsselbegriffe prüfen",
        "Zuordnungsaufgaben müssen logische Paare bilden",
    ],
    format: "Gib die Antwort als JSON gemäß der obigen Struktur zurück.",
    type_descriptions: [
        "Multiple Choice - Frage mit einer richtigen und mehreren falschen Antworten",
        "Freitext - Antwort in eigenen Worten mit Schlüsselbegriffen zur Bewertung",
        "Lückentext - Satz mit fehlenden Wörtern",
        "Zuordnung - Begriffe zu Definitionen",
    ],
};

const SK: PromptPhrases = PromptPhrases {
    role: "Si expert na tvorbu vzdelávacích testov. Tvojou úlohou je vytvárať kvalitné, relevantné \
        a pedagogicky správne testové otázky v slovenčine.",
    schema_intro: "Vráť odpoveď IBA ako validné JSON pole s touto štruktúrou:",
    json_only: "Nepíš žiadny ďalší text, iba validný JSON.",
    topic_label: "Hlavná otázka/téma",
    context_label: "Kontext",
    generate_types: "Vygeneruj testové otázky v nasledujúcich typoch:",
    variants: "Pre každý typ otázky vygeneruj 1-2 kvalitné varianty.",
    requirements: "Požiadavky:",
    constraints: [
        "Otázky musia byť relevantné k hlavnej téme",
        "Odpovede pri výbere z možností musia byť vierohodné a náročné",
        "Voľné odpovede musia mať jasné hodnotiace kritériá",
        "Doplňovačky musia testovať kľúčové pojmy",
        "Priraďovanie musí mať logické páry",
    ],
    format: "Vráť odpoveď vo formáte JSON podľa uvedenej štruktúry.",
    type_descriptions: [
        "Výber z možností - otázka s jednou správnou a niekoľkými nesprávnymi odpoveďami",
        "Voľná odpoveď - odpoveď vlastnými slovami s kľúčovými pojmami na hodnotenie",
        "Doplňovačka - veta s chýbajúcimi slovami",
        "Priraďovanie - pojmy k definíciám",
    ],
};

fn phrases(language: Language) -> &'static PromptPhrases {
    match language {
        Language::Cs => &CS,
        Language::En => &EN,
        Language::De => &DE,
        Language::Sk => &SK,
    }
}

fn type_description(phrases: &PromptPhrases, question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::MultipleChoice => phrases.type_descriptions[0],
        QuestionType::FreeText => phrases.type_descriptions[1],
        QuestionType::FillInBlank => phrases.type_descriptions[2],
        QuestionType::Matching => phrases.type_descriptions[3],
    }
}

pub fn system_prompt(language: Language) -> String {
    let phrases = phrases(language);
    format!(
        "{}\n\n{}\n{}\n\n{}",
        phrases.role, phrases.schema_intro, JSON_SCHEMA, phrases.json_only
    )
}

/// Empty `requested_types` asks for all four kinds.
pub fn build_prompt(
    topic: &str,
    context: &str,
    requested_types: &[QuestionType],
    language: Language,
    max_context_chars: usize,
) -> String {
    let phrases = phrases(language);
    let types: &[QuestionType] = if requested_types.is_empty() {
        &QuestionType::ALL
    } else {
        requested_types
    };

    let mut prompt = format!("{}: \"{}\"\n\n", phrases.topic_label, topic.trim());

    let context = context.trim();
    if !context.is_empty() {
        let (excerpt, _) = excerpt(context, max_context_chars);
        prompt.push_str(&format!("{}: {}\n\n", phrases.context_label, excerpt));
    }

    prompt.push_str(phrases.generate_types);
    prompt.push('\n');
    for question_type in types {
        prompt.push_str(&format!("- {}\n", type_description(phrases, *question_type)));
    }

    prompt.push('\n');
    prompt.push_str(phrases.variants);
    prompt.push_str("\n\n");
    prompt.push_str(phrases.requirements);
    prompt.push('\n');
    for constraint in phrases.constraints {
        prompt.push_str(&format!("- {}\n", constraint));
    }

    prompt.push('\n');
    prompt.push_str(phrases.format);
    prompt
}
