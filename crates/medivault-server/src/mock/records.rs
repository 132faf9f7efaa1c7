// crates/medivault-server/src/mock/records.rs
// Demo records returned by `search` when the vector-search service is unavailable.
// All records are fictional.

use super::{KeywordEntry, KeywordTable};
use medivault_types::{Role, SearchResult};
use serde_json::json;

#[derive(Debug)]
pub struct DemoRecord {
    pub id: &'static str,
    pub category: &'static str,
    pub content: &'static str,
    pub score: f32,
}

impl DemoRecord {
    fn to_result(&self, role: Role) -> SearchResult {
        SearchResult {
            id: self.id.to_string(),
            score: self.score,
            content: self.content.to_string(),
            metadata: json!({
                "category": self.category,
                "role": role.as_str(),
                "encrypted": true,
            }),
        }
    }
}

type RecordSet = &'static [DemoRecord];

const DIABETES_RECORDS: RecordSet = &[
    DemoRecord {
        id: "rec-dm-1042",
        category: "endocrinology",
        content: "58M, T2DM dx 2019. HbA1c 7.8% on metformin 1000mg BID. Reports polyuria and fatigue.",
        score: 0.94,
    },
    DemoRecord {
        id: "rec-dm-2217",
        category: "endocrinology",
        content: "63F, T2DM with peripheral neuropathy. Added empagliflozin; HbA1c 8.1% to 7.2% over 6 months.",
        score: 0.91,
    },
    DemoRecord {
        id: "rec-dm-3380",
        category: "primary-care",
        content: "47F, new dx T2DM on screening. Fasting glucose 142 mg/dL. Lifestyle counselling started.",
        score: 0.87,
    },
];

const HYPERTENSION_RECORDS: RecordSet = &[
    DemoRecord {
        id: "rec-htn-0831",
        category: "cardiology",
        content: "71M, stage 2 HTN, BP 152/94 on lisinopril 20mg. Amlodipine 5mg added.",
        score: 0.92,
    },
    DemoRecord {
        id: "rec-htn-1190",
        category: "primary-care",
        content: "55F, stage 1 HTN, home readings 134/86. DASH diet, recheck in 3 months.",
        score: 0.88,
    },
];

const CARDIAC_RECORDS: RecordSet = &[
    DemoRecord {
        id: "rec-card-0412",
        category: "cardiology",
        content: "66M, chest pain on exertion. ECG ST depression V4-V6, troponin negative x2. Stress test ordered.",
        score: 0.93,
    },
    DemoRecord {
        id: "rec-card-0977",
        category: "cardiology",
        content: "59F, LDL 168 mg/dL, ASCVD risk 11%. Atorvastatin 40mg started.",
        score: 0.86,
    },
];

const MEDICATION_RECORDS: RecordSet = &[DemoRecord {
    id: "rec-med-5521",
    category: "pharmacy",
    content: "74F on warfarin (INR 2.6) prescribed ibuprofen for OA. Interaction flagged, switched to acetaminophen.",
    score: 0.90,
}];

const CARE_RECORDS: RecordSet = &[
    DemoRecord {
        id: "rec-care-3012",
        category: "nursing",
        content: "Ward 4B: bedtime glucose checks completed 96% of shifts this week. Two hypoglycemia events treated.",
        score: 0.89,
    },
    DemoRecord {
        id: "rec-care-3140",
        category: "nursing",
        content: "Discharge checklist completed with teach-back for 18 of 19 patients.",
        score: 0.84,
    },
];

const AUDIT_RECORDS: RecordSet = &[
    DemoRecord {
        id: "rec-audit-0007",
        category: "compliance",
        content: "Weekly access review: 342 record queries, 3 failed access attempts, all investigated.",
        score: 0.91,
    },
    DemoRecord {
        id: "rec-audit-0008",
        category: "compliance",
        content: "Encryption key rotation completed for all indexes. No plaintext exposure detected.",
        score: 0.85,
    },
];

const COHORT_RECORDS: RecordSet = &[
    DemoRecord {
        id: "rec-cohort-t2dm",
        category: "research",
        content: "De-identified T2DM cohort: n=1284, median age 58, median HbA1c 7.4%.",
        score: 0.93,
    },
    DemoRecord {
        id: "rec-cohort-trial",
        category: "research",
        content: "Trial screen: 213 eligible records; leading exclusion eGFR < 30.",
        score: 0.87,
    },
];

static DOCTOR: &[KeywordEntry<RecordSet>] = &[
    KeywordEntry {
        keywords: &["diabetes", "type 2", "glucose", "insulin", "a1c"],
        value: DIABETES_RECORDS,
    },
    KeywordEntry {
        keywords: &["hypertension", "blood pressure", "bp"],
        value: HYPERTENSION_RECORDS,
    },
    KeywordEntry {
        keywords: &["heart", "cardiac", "chest pain", "cholesterol"],
        value: CARDIAC_RECORDS,
    },
    KeywordEntry {
        keywords: &["drug", "interaction", "medication", "warfarin"],
        value: MEDICATION_RECORDS,
    },
];

static CLINICIAN: &[KeywordEntry<RecordSet>] = &[
    KeywordEntry {
        keywords: &["diabetes", "type 2", "glucose", "insulin"],
        value: DIABETES_RECORDS,
    },
    KeywordEntry {
        keywords: &["discharge", "care plan", "nursing", "shift"],
        value: CARE_RECORDS,
    },
    KeywordEntry {
        keywords: &["hypertension", "blood pressure", "bp", "vitals"],
        value: HYPERTENSION_RECORDS,
    },
];

static ADMIN: &[KeywordEntry<RecordSet>] = &[KeywordEntry {
    keywords: &["audit", "compliance", "hipaa", "access", "encryption"],
    value: AUDIT_RECORDS,
}];

static RESEARCHER: &[KeywordEntry<RecordSet>] = &[
    KeywordEntry {
        keywords: &["cohort", "trial", "study", "diabetes", "eligib"],
        value: COHORT_RECORDS,
    },
    KeywordEntry {
        keywords: &["hypertension", "blood pressure"],
        value: HYPERTENSION_RECORDS,
    },
];

static DOCTOR_TABLE: KeywordTable<RecordSet> = KeywordTable::new(DOCTOR);
static CLINICIAN_TABLE: KeywordTable<RecordSet> = KeywordTable::new(CLINICIAN);
static ADMIN_TABLE: KeywordTable<RecordSet> = KeywordTable::new(ADMIN);
static RESEARCHER_TABLE: KeywordTable<RecordSet> = KeywordTable::new(RESEARCHER);

/// Demo search results for a role.
///
/// Unmatched queries fall back to the role's general record set so the demo
/// always has something to show.
pub fn demo_results(role: Role, query: &str, top_k: usize) -> Vec<SearchResult> {
    let (table, default) = match role {
        Role::Doctor => (&DOCTOR_TABLE, DIABETES_RECORDS),
        Role::Clinician => (&CLINICIAN_TABLE, CARE_RECORDS),
        Role::Admin => (&ADMIN_TABLE, AUDIT_RECORDS),
        Role::Researcher => (&RESEARCHER_TABLE, COHORT_RECORDS),
    };
    let records = table.lookup(query).copied().unwrap_or(default);

    records
        .iter()
        .take(top_k)
        .map(|r| r.to_result(role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_diabetes_records() {
        let results = demo_results(Role::Doctor, "type 2 diabetes symptoms", 5);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, "rec-dm-1042");
        assert_eq!(results[0].metadata["role"], "doctor");
    }

    #[test]
    fn test_top_k_truncates() {
        let results = demo_results(Role::Doctor, "diabetes", 1);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_unmatched_uses_role_default() {
        let results = demo_results(Role::Admin, "something unrelated", 5);
        assert_eq!(results[0].id, "rec-audit-0007");
    }

    #[test]
    fn test_scores_descend() {
        let results = demo_results(Role::Researcher, "trial cohort", 5);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
