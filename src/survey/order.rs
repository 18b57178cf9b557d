use super::types::Question;

/// Display order: profile questions first (by category priority, then survey
/// order), everything else after in survey order.
pub fn display_order(questions: &[Question]) -> Vec<&Question> {
    let mut ordered: Vec<(usize, &Question)> = questions.iter().enumerate().collect();
    ordered.sort_by_key(|(index, q)| {
        let rank = q.profile.map_or(usize::MAX, |p| p.priority());
        (rank, *index)
    });
    ordered.into_iter().map(|(_, q)| q).collect()
}
