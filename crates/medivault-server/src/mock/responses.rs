// crates/medivault-server/src/mock/responses.rs
// Canned assistant answers for offline mode

use super::{KeywordEntry, KeywordTable};

pub const DEFAULT_RESPONSE: &str = "I searched the encrypted record store but found no records \
closely matching your question.\n\n\
**Try asking about:**\n\
- Symptoms and management of Type 2 Diabetes\n\
- Hypertension treatment guidelines\n\
- Drug interactions for common medications\n\
- Cardiac risk assessment\n\
- Asthma and COPD management\n\n\
*All queries are processed over encrypted records. Results are for clinical decision support only.*";

static ENTRIES: &[KeywordEntry<&str>] = &[
    KeywordEntry {
        keywords: &["diabetes", "type 2", "glucose", "insulin", "a1c", "metformin"],
        value: "## Type 2 Diabetes Overview\n\n\
**Common symptoms:**\n\
- Increased thirst and frequent urination\n\
- Fatigue and blurred vision\n\
- Slow-healing sores and frequent infections\n\
- Unexplained weight loss\n\n\
**Management:**\n\
1. Lifestyle modification: diet, exercise, weight management\n\
2. First-line pharmacotherapy: Metformin\n\
3. HbA1c target below 7% for most adults\n\n\
*Based on 3 encrypted patient records matching your query.*",
    },
    KeywordEntry {
        keywords: &["hypertension", "blood pressure", "bp", "ace inhibitor", "lisinopril"],
        value: "## Hypertension Management\n\n\
**Classification:**\n\
- Elevated: 120-129 / <80 mmHg\n\
- Stage 1: 130-139 / 80-89 mmHg\n\
- Stage 2: 140+ / 90+ mmHg\n\n\
**First-line agents:** thiazide diuretics, ACE inhibitors, ARBs, calcium channel blockers.\n\n\
**Lifestyle:** DASH diet, sodium below 2,300 mg/day, regular aerobic exercise.\n\n\
*Based on 4 encrypted patient records matching your query.*",
    },
    KeywordEntry {
        keywords: &["drug", "interaction", "medication", "warfarin", "prescri"],
        value: "## Drug Interaction Check\n\n\
**High-risk combinations found in the record set:**\n\
- Warfarin + NSAIDs: increased bleeding risk\n\
- ACE inhibitors + potassium-sparing diuretics: hyperkalemia\n\
- Metformin + iodinated contrast: hold 48h around the procedure\n\n\
**Recommendation:** review the full medication list and consult pharmacy for dose adjustment.\n\n\
*Based on 2 encrypted medication records.*",
    },
    KeywordEntry {
        keywords: &["heart", "cardiac", "chest pain", "cholesterol", "statin"],
        value: "## Cardiac Risk Assessment\n\n\
**Key risk factors:** hypertension, hyperlipidemia, smoking, diabetes, family history.\n\n\
**Workup:** ECG, troponin series for acute chest pain, lipid panel, ASCVD 10-year risk score.\n\n\
**Prevention:** statin therapy when ASCVD risk is 7.5% or higher, blood pressure control, smoking cessation.\n\n\
*Based on 5 encrypted cardiology records.*",
    },
    KeywordEntry {
        keywords: &["asthma", "copd", "inhaler", "breathing", "respiratory"],
        value: "## Respiratory Care Summary\n\n\
**Asthma:** step-wise therapy starting with as-needed ICS-formoterol; assess control every visit.\n\n\
**COPD:** LAMA or LAMA/LABA maintenance, pulmonary rehabilitation, vaccinations.\n\n\
**Red flags:** SpO2 below 92%, inability to speak in full sentences, silent chest.\n\n\
*Based on 3 encrypted respiratory records.*",
    },
];

static TABLE: KeywordTable<&str> = KeywordTable::new(ENTRIES);

/// Offline responder over the general canned-answer table
#[derive(Debug, Clone, Copy, Default)]
pub struct MockResponder;

impl MockResponder {
    /// Always returns an answer; unmatched queries get [`DEFAULT_RESPONSE`]
    pub fn respond(&self, query: &str) -> &'static str {
        TABLE.lookup(query).copied().unwrap_or(DEFAULT_RESPONSE)
    }
}
