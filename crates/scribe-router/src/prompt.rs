//! Instruction prompt sent to the classification backend.

const CLASSIFICATION_PROMPT: &str = r#"Du agierst als Experte im Management von Benutzeranfragen.
Deine Aufgabe ist es, Benutzeranfragen in exakt eine der folgenden vier Kategorien einzustufen: citation, structure, grammar, none.
Jede Anfrage muss ausschließlich einer Kategorie zugeordnet werden.

Beachte: Die Anfragen können auf Deutsch formuliert sein.

Mögliche Kategorien und deren Kriterien:

"citation"
Für Anfragen, die sich auf die Erstellung von Zitaten beziehen. Achte besonders auf Wörter wie „Zitat“ sowie Formulierungen wie:

„Erstelle mir ein Zitat“

„Mache ein Zitat zu“
Beispiele:

„Erstelle mir hieraus ein Zitat im Chicago-Stil“ → citation

„Ich möchte daraus ein Zitat haben“ → citation

"structure"
Für Anfragen, die den Aufbau oder die Gliederung eines Textes oder Themas betreffen. Achte auf Wörter wie „Gliederung“ oder „Struktur“ und Formulierungen wie:

„Erstelle mir eine Gliederung hierzu“

„Gib mir eine Struktur zu diesem Thema“
Beispiele:

„Erstelle eine Gliederung zum Thema Delfine“ → structure

„Gib mir eine Struktur für meine Bachelorarbeit“ → structure

"grammar"
Für Anfragen, bei denen es um die grammatikalische Verbesserung oder stilistische Überarbeitung eines Textes geht. Achte auf Phrasen wie:

„Verbessere mir diesen Text“

„Schreib das schöner“
Beispiele:

„Verbessere mir das Folgende:“ → grammar

„Bitte schreib das so um, dass es besser klingt“ → grammar

"none"
Für Anfragen, die keinen Bezug zu den oben genannten Kategorien oder zur Erstellung wissenschaftlicher Texte haben. Auch wenn nicht klar ist, welche Kategorie zutrifft, solltest du „none“ wählen.
Beispiele:

„Wie heißt mein Hund?“ → none

„Wie ist das Wetter morgen?“ → none

„Wie groß ist die Erde?“ → none

„Was ist die Hauptstadt von Frankreich?“ → none

Wichtige Anweisung:
Antworte ausschließlich mit dem Namen der Kategorie! Deine Antwort darf nur eine der folgenden Optionen enthalten:

citation

structure

grammar

none

Benutzeranfrage:
"{request}""#;

/// The part of a message the classifier sees: everything before the first `:`.
///
/// Users tend to write "Verbessere mir das Folgende: <long text>", and only
/// the instruction in front of the colon says what they want.
pub fn relevant_text(text: &str) -> &str {
    text.split_once(':').map_or(text, |(head, _)| head)
}

/// Build the classification prompt for a user message.
pub fn classification_prompt(text: &str) -> String {
    CLASSIFICATION_PROMPT.replace("{request}", relevant_text(text))
}
