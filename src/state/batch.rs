/// Batch planning and result tracking
///
/// A submission turns the prompt list into a fresh batch of Pending
/// placeholders, then one network call per placeholder runs to
/// completion independently. Completions come back in any order and
/// patch the list by id. Every batch carries a token; completions
/// from a superseded batch are discarded instead of writing into the
/// replacement list.

use chrono::Local;

use super::data::{GeneratedImage, GenerationStatus, ReadyImage};

/// Prompts that actually participate in a batch: non-whitespace
/// content only, original order and text preserved.
pub fn valid_prompts(prompts: &[String]) -> Vec<String> {
    prompts
        .iter()
        .filter(|prompt| !prompt.trim().is_empty())
        .cloned()
        .collect()
}

/// Build the placeholder list for a new batch.
///
/// One Pending placeholder per valid prompt, indexed 1..=n in prompt
/// order. Ids are allocated from `next_id` so they stay unique across
/// batches and a late completion can never collide with a new card.
pub fn plan(prompts: &[String], batch: u64, next_id: &mut u64) -> Vec<GeneratedImage> {
    valid_prompts(prompts)
        .into_iter()
        .enumerate()
        .map(|(position, prompt)| {
            let id = *next_id;
            *next_id += 1;

            GeneratedImage {
                id,
                batch,
                prompt,
                index: position + 1,
                status: GenerationStatus::Pending,
                created_at: Local::now(),
            }
        })
        .collect()
}

/// Start a new batch, or leave everything alone when the user
/// declined the submission.
///
/// On confirmation the token is bumped and the result list is
/// replaced with fresh placeholders; returns true. On decline the
/// token and the previous results stay exactly as they were.
pub fn begin(
    confirmed: bool,
    prompts: &[String],
    token: &mut u64,
    next_id: &mut u64,
    results: &mut Vec<GeneratedImage>,
) -> bool {
    if !confirmed {
        return false;
    }

    *token += 1;
    *results = plan(prompts, *token, next_id);
    true
}

/// Apply one call's outcome to the result list.
///
/// Returns true when a placeholder was actually transitioned. The
/// outcome is dropped when its batch token does not match the active
/// batch (stale completion), when no card has the id, or when the
/// card already resolved (each result transitions exactly once).
pub fn apply_outcome(
    results: &mut [GeneratedImage],
    active_batch: u64,
    batch: u64,
    id: u64,
    outcome: Result<ReadyImage, String>,
) -> bool {
    if batch != active_batch {
        println!("⏭️  Dropping stale completion from superseded batch {}", batch);
        return false;
    }

    let Some(result) = results.iter_mut().find(|result| result.id == id) else {
        return false;
    };

    if !result.is_pending() {
        return false;
    }

    result.status = match outcome {
        Ok(image) => GenerationStatus::Ready(image),
        Err(message) => GenerationStatus::Failed(message),
    };

    true
}

/// Whether any call of the current batch is still unresolved
pub fn in_flight(results: &[GeneratedImage]) -> bool {
    results.iter().any(GeneratedImage::is_pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::widget::image::Handle;

    fn prompts(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|entry| entry.to_string()).collect()
    }

    fn ready() -> ReadyImage {
        ReadyImage {
            bytes: vec![1, 2, 3],
            mime_type: "image/png".to_string(),
            width: 4,
            height: 4,
            preview: Handle::from_bytes(vec![1, 2, 3]),
        }
    }

    #[test]
    fn test_plan_filters_and_numbers_prompts() {
        let mut next_id = 10;
        let batch = plan(
            &prompts(&["first scene", "   ", "", "second scene", "\t\n"]),
            7,
            &mut next_id,
        );

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].prompt, "first scene");
        assert_eq!(batch[1].prompt, "second scene");
        // 1-based and gap-free despite the skipped entries
        assert_eq!(batch[0].index, 1);
        assert_eq!(batch[1].index, 2);
        assert!(batch.iter().all(|result| result.batch == 7));
        assert!(batch.iter().all(GeneratedImage::is_pending));
        // Ids keep advancing for the next batch
        assert_eq!(batch[0].id, 10);
        assert_eq!(batch[1].id, 11);
        assert_eq!(next_id, 12);
    }

    #[test]
    fn test_plan_with_no_valid_prompts_is_empty() {
        let mut next_id = 0;
        assert!(plan(&prompts(&["", "  "]), 1, &mut next_id).is_empty());
        assert_eq!(next_id, 0);
    }

    #[test]
    fn test_outcomes_are_independent() {
        let mut next_id = 0;
        let mut results = plan(&prompts(&["a", "b", "c"]), 1, &mut next_id);
        let ids: Vec<u64> = results.iter().map(|result| result.id).collect();

        assert!(apply_outcome(
            &mut results,
            1,
            1,
            ids[1],
            Err("quota exceeded".to_string()),
        ));

        // One failure flips nothing else
        assert!(results[0].is_pending());
        assert!(matches!(results[1].status, GenerationStatus::Failed(_)));
        assert!(results[2].is_pending());
        assert!(in_flight(&results));

        assert!(apply_outcome(&mut results, 1, 1, ids[0], Ok(ready())));
        assert!(apply_outcome(&mut results, 1, 1, ids[2], Ok(ready())));
        assert!(!in_flight(&results));
    }

    #[test]
    fn test_results_transition_exactly_once() {
        let mut next_id = 0;
        let mut results = plan(&prompts(&["a"]), 1, &mut next_id);
        let id = results[0].id;

        assert!(apply_outcome(&mut results, 1, 1, id, Ok(ready())));
        // A second completion for the same card is ignored
        assert!(!apply_outcome(
            &mut results,
            1,
            1,
            id,
            Err("late failure".to_string()),
        ));
        assert!(results[0].ready().is_some());
    }

    #[test]
    fn test_stale_batch_completions_are_dropped() {
        let mut next_id = 0;
        let mut old_batch = plan(&prompts(&["a"]), 1, &mut next_id);
        let old_id = old_batch[0].id;

        // A new submission replaced the list and bumped the token
        let mut results = plan(&prompts(&["b"]), 2, &mut next_id);

        assert!(!apply_outcome(&mut results, 2, 1, old_id, Ok(ready())));
        assert!(results[0].is_pending());

        // The old list would have accepted it, but it is gone
        assert!(apply_outcome(&mut old_batch, 1, 1, old_id, Ok(ready())));
    }

    #[test]
    fn test_declined_submission_changes_nothing() {
        let mut token = 0;
        let mut next_id = 0;
        let mut results = Vec::new();
        assert!(begin(
            true,
            &prompts(&["a", "b"]),
            &mut token,
            &mut next_id,
            &mut results,
        ));
        assert_eq!(token, 1);
        assert_eq!(results.len(), 2);
        let id = results[0].id;
        assert!(apply_outcome(&mut results, token, token, id, Ok(ready())));

        // Declining the next submission keeps the finished batch
        assert!(!begin(
            false,
            &prompts(&["c"]),
            &mut token,
            &mut next_id,
            &mut results,
        ));
        assert_eq!(token, 1);
        assert_eq!(results.len(), 2);
        assert!(results[0].ready().is_some());
        assert_eq!(results[0].prompt, "a");

        // A confirmed submission still replaces everything
        assert!(begin(
            true,
            &prompts(&["c"]),
            &mut token,
            &mut next_id,
            &mut results,
        ));
        assert_eq!(token, 2);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].prompt, "c");
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut next_id = 0;
        let mut results = plan(&prompts(&["a"]), 1, &mut next_id);
        assert!(!apply_outcome(&mut results, 1, 1, 999, Ok(ready())));
        assert!(results[0].is_pending());
    }
}
