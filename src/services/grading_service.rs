use std::collections::HashMap;

use uuid::Uuid;

use crate::models::question::{OptionSlot, Question};

#[derive(Debug, Clone)]
pub struct GradedAnswer {
    pub question_id: Uuid,
    pub selected_option: OptionSlot,
    pub is_correct: bool,
}

pub struct GradingService;

impl GradingService {
    /// Grades one attempt against the sampled question set. Questions absent
    /// from `responses` are skipped entirely: no graded answer, counted
    /// neither right nor wrong.
    pub fn grade(
        questions: &[Question],
        responses: &HashMap<Uuid, OptionSlot>,
    ) -> (i32, Vec<GradedAnswer>) {
        let mut score: i32 = 0;
        let mut graded: Vec<GradedAnswer> = Vec::new();

        for question in questions {
            let Some(&selected) = responses.get(&question.id) else {
                continue;
            };

            let is_correct = selected == question.correct_option;
            if is_correct {
                score += 1;
            }

            graded.push(GradedAnswer {
                question_id: question.id,
                selected_option: selected,
                is_correct,
            });
        }

        (score, graded)
    }
}
