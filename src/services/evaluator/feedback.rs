use crate::types::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Excellent,
    Good,
    Partial,
    Insufficient,
}

/// Report lines for one language.
pub struct FeedbackPhrases {
    pub excellent: &'static str,
    pub good: &'static str,
    pub partial: &'static str,
    pub insufficient: &'static str,
    pub not_evaluated: &'static str,
    pub not_evaluated_hint: &'static str,

    pub strength_detailed: &'static str,
    pub strength_relevant: &'static str,
    pub strength_vocabulary: &'static str,
    pub strength_structured: &'static str,
    pub strength_coherent: &'static str,

    pub improve_length: &'static str,
    pub improve_relevance: &'static str,
    pub improve_vocabulary: &'static str,
    pub improve_sentences: &'static str,
    pub improve_punctuation: &'static str,
    pub improve_connectives: &'static str,
}

impl FeedbackPhrases {
    pub fn for_tier(&self, tier: FeedbackTier) -> &'static str {
        match tier {
            FeedbackTier::Excellent => self.excellent,
            FeedbackTier::Good => self.good,
            FeedbackTier::Partial => self.partial,
            FeedbackTier::Insufficient => self.insufficient,
        }
    }
}

const CS: FeedbackPhrases = FeedbackPhrases {
    excellent: "Výborná odpověď! Prokázali jste dobré porozumění tématu a vyjádřili se jasně.",
    good: "Dobrá odpověď! Téma jste pochopili, zkuste být příště konkrétnější.",
    partial: "Odpověď byla částečně správná, ale zkuste více rozvinout vaše myšlenky.",
    insufficient: "Zkuste odpovědět podrobněji a více se zaměřit na položenou otázku.",
    not_evaluated: "Nepodařilo se vyhodnotit odpověď. Zkuste to prosím znovu.",
    not_evaluated_hint: "Zkuste odpovědět jasně a srozumitelně",

    strength_detailed: "Podrobná a rozvinutá odpověď",
    strength_relevant: "Odpověď se drží položené otázky",
    strength_vocabulary: "Používáte odbornou slovní zásobu",
    strength_structured: "Odpověď je rozdělena do více vět",
    strength_coherent: "Myšlenky jsou logicky propojené",

    improve_length: "Rozveďte odpověď podrobněji",
    improve_relevance: "Zaměřte se více na položenou otázku",
    improve_vocabulary: "Použijte více odborných pojmů z oboru",
    improve_sentences: "Rozdělte odpověď do více vět",
    improve_punctuation: "Používejte interpunkci",
    improve_connectives: "Propojte myšlenky spojkami",
};

const EN: FeedbackPhrases = FeedbackPhrases {
    excellent: "Excellent answer! You showed a good understanding of the topic and expressed yourself clearly.",
    good: "Good answer! You understood the topic, try to be more specific next time.",
    partial: "The answer was partially correct, but try to develop your thoughts further.",
    insufficient: "Try to answer in more detail and focus more on the question asked.",
    not_evaluated: "The answer could not be evaluated. Please try again.",
    not_evaluated_hint: "Try to answer clearly and understandably",

    strength_detailed: "Detailed, well-developed answer",
    strength_relevant: "The answer stays on the question asked",
    strength_vocabulary: "Uses professional vocabulary",
    strength_structured: "The answer is split into several sentences",
    strength_coherent: "Ideas are logically connected",

    improve_length: "Develop the answer in more detail",
    improve_relevance: "Focus more on the question asked",
    improve_vocabulary: "Use more domain terminology",
    improve_sentences: "Split the answer into several sentences",
    improve_punctuation: "Use punctuation",
    improve_connectives: "Connect your ideas with conjunctions",
};

const DE: FeedbackPhrases = FeedbackPhrases {
    excellent: "Ausgezeichnete Antwort! Sie haben das Thema gut verstanden und sich klar ausgedrückt.",
    good: "Gute Antwort! Sie haben das Thema verstanden, versuchen Sie beim nächsten Mal konkreter zu sein.",
    partial: "Die Antwort war teilweise richtig, versuchen Sie aber, Ihre Gedanken weiter auszuführen.",
    insufficient: "Versuchen Sie, ausführlicher zu antworten und sich mehr auf die gestellte Frage zu konzentrieren.",
    not_evaluated: "Die Antwort konnte nicht bewertet werden. Bitte versuchen Sie es erneut.",
    not_evaluated_hint: "Versuchen Sie, klar und verständlich zu antworten",

    strength_detailed: "Ausführliche und gut entwickelte Antwort",
    strength_relevant: "Die Antwort bleibt bei der gestellten Frage",
    strength_vocabulary: "Verwendet Fachvokabular",
    strength_structured: "Die Antwort ist in mehrere Sätze gegliedert",
    strength_coherent: "Die Gedanken sind logisch verbunden",

    improve_length: "Führen Sie die Antwort ausführlicher aus",
    improve_relevance: "Konzentrieren Sie sich mehr auf die gestellte Frage",
    improve_vocabulary: "Verwenden Sie mehr Fachbegriffe",
    improve_sentences: "Gliedern Sie die Antwort in mehrere Sätze",
    improve_punctuation: "Verwenden Sie Satzzeichen",
    improve_connectives: "Verbinden Sie Ihre Gedanken mit Konjunktionen",
};

const SK: FeedbackPhrases = FeedbackPhrases {
    excellent: "Výborná odpoveď! Preukázali ste dobré porozumenie téme a vyjadrili ste sa jasne.",
    good: "Dobrá odpoveď! Tému ste pochopili, skúste byť nabudúce konkrétnejší.",
    partial: "Odpoveď bola čiastočne správna, ale skúste viac rozvinúť vaše myšlienky.",
    insufficient: "Skúste odpovedať podrobnejšie a viac sa zamerať na položenú otázku.",
    not_evaluated: "Odpoveď sa nepodarilo vyhodnotiť. Skúste to prosím znova.",
    not_evaluated_hint: "Skúste odpovedať jasne a zrozumiteľne",

    strength_detailed: "Podrobná a rozvinutá odpoveď",
    strength_relevant: "Odpoveď sa drží položenej otázky",
    strength_vocabulary: "Používate odbornú slovnú zásobu",
    strength_structured: "Odpoveď je rozdelená do viacerých viet",
    strength_coherent: "Myšlienky sú logicky prepojené",

    improve_length: "Rozveďte odpoveď podrobnejšie",
    improve_relevance: "Zamerajte sa viac na položenú otázku",
    improve_vocabulary: "Použite viac odborných pojmov z oboru",
    improve_sentences: "Rozdeľte odpoveď do viacerých viet",
    improve_punctuation: "Používajte interpunkciu",
    improve_connectives: "Prepojte myšlienky spojkami",
};

pub fn phrases(language: Language) -> &'static FeedbackPhrases {
    match language {
        Language::Cs => &CS,
        Language::En => &EN,
        Language::De => &DE,
        Language::Sk => &SK,
    }
}
