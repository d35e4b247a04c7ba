//! Photo evidence extraction from assessment questions.

use site_risk_assessment_models::{Assessment, AssessmentQuestion};
use site_risk_report_models::{PhotoEvidence, QuestionCollection};

fn from_questions(
    questions: &[AssessmentQuestion],
    collection: QuestionCollection,
) -> impl Iterator<Item = PhotoEvidence> + '_ {
    questions.iter().filter_map(move |q| {
        let urls: Vec<String> = q
            .evidence
            .iter()
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect();

        (!urls.is_empty()).then(|| PhotoEvidence {
            question_id: q.id.clone(),
            question: q.question.clone(),
            collection,
            urls,
        })
    })
}

/// Collects photo evidence from the facility survey, then the interview.
#[must_use]
pub fn extract_photo_evidence(assessment: &Assessment) -> Vec<PhotoEvidence> {
    from_questions(&assessment.facility_questions, QuestionCollection::Facility)
        .chain(from_questions(
            &assessment.interview_questions,
            QuestionCollection::Interview,
        ))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, evidence: &[&str]) -> AssessmentQuestion {
        AssessmentQuestion {
            id: id.to_string(),
            question: format!("Question {id}"),
            response: None,
            evidence: evidence.iter().map(|e| (*e).to_string()).collect(),
        }
    }

    fn assessment(
        facility: Vec<AssessmentQuestion>,
        interview: Vec<AssessmentQuestion>,
    ) -> Assessment {
        Assessment {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            title: "Annual review".to_string(),
            site_id: None,
            created_at: None,
            scenarios: Vec::new(),
            facility_questions: facility,
            interview_questions: interview,
        }
    }

    #[test]
    fn scans_both_collections_in_order() {
        let evidence = extract_photo_evidence(&assessment(
            vec![question("f1", &["door.jpg"]), question("f2", &[])],
            vec![question("i1", &["gate.jpg", "fence.jpg"])],
        ));
        assert_eq!(evidence.len(), 2);
        assert_eq!(evidence[0].question_id, "f1");
        assert_eq!(evidence[0].collection, QuestionCollection::Facility);
        assert_eq!(evidence[1].collection, QuestionCollection::Interview);
        assert_eq!(evidence[1].urls, vec!["gate.jpg", "fence.jpg"]);
    }

    #[test]
    fn blank_urls_are_ignored() {
        let evidence = extract_photo_evidence(&assessment(
            vec![question("f1", &["", "  "])],
            vec![question("i1", &[" ", "x.png"])],
        ));
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].urls, vec!["x.png"]);
    }

    #[test]
    fn no_questions_no_evidence() {
        assert!(extract_photo_evidence(&assessment(Vec::new(), Vec::new())).is_empty());
    }
}
