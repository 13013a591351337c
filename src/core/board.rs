use serde::Serialize;
use tracing::warn;

use super::status::Bucket;
use super::store::types::Request;

/// The kanban view of one user's requests. `unknown` holds rows whose status
/// string fell outside the closed set; they are kept visible rather than
/// dropped, since losing them would hide a data error.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Board {
    pub open: Vec<Request>,
    pub in_progress: Vec<Request>,
    pub completed: Vec<Request>,
    pub unknown: Vec<Request>,
}

impl Board {
    pub fn len(&self) -> usize {
        self.open.len() + self.in_progress.len() + self.completed.len() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition a full request list into the three kanban buckets. Pure and
/// recomputed in full on every refresh; relative order within a bucket is the
/// order of the input.
pub fn partition(requests: Vec<Request>) -> Board {
    let mut board = Board::default();
    for request in requests {
        match request.status.known() {
            Some(status) => match status.bucket() {
                Bucket::Open => board.open.push(request),
                Bucket::InProgress => board.in_progress.push(request),
                Bucket::Completed => board.completed.push(request),
            },
            None => {
                warn!(
                    request_id = %request.id,
                    status = %request.status.as_str(),
                    "request has a status outside the known set"
                );
                board.unknown.push(request);
            }
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::{RequestStatus, StatusValue};

    fn request_with_status(id: &str, status: StatusValue) -> Request {
        Request {
            id: id.to_string(),
            user_id: "user-1".to_string(),
            title: "Dentist".to_string(),
            description: "Checkup appointment".to_string(),
            callback_number: "+4915112345678".to_string(),
            number_to_call: None,
            preferred_time: "mornings".to_string(),
            status,
            summary: None,
            created_at: "2026-08-25 09:00:00".to_string(),
            updated_at: "2026-08-25 09:00:00".to_string(),
        }
    }

    #[test]
    fn every_known_status_lands_in_exactly_one_bucket() {
        let requests: Vec<Request> = RequestStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, s)| request_with_status(&format!("r{i}"), StatusValue::Known(*s)))
            .collect();

        let board = partition(requests);
        assert_eq!(board.open.len(), 2);
        assert_eq!(board.in_progress.len(), 3);
        assert_eq!(board.completed.len(), 3);
        assert!(board.unknown.is_empty());
        assert_eq!(board.len(), RequestStatus::ALL.len());
    }

    #[test]
    fn out_of_set_status_is_flagged_not_dropped() {
        let requests = vec![
            request_with_status("r1", StatusValue::Known(RequestStatus::Queued)),
            request_with_status("r2", StatusValue::Unknown("on_hold".to_string())),
        ];

        let board = partition(requests);
        assert_eq!(board.open.len(), 1);
        assert_eq!(board.unknown.len(), 1);
        assert_eq!(board.unknown[0].id, "r2");
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn input_order_is_preserved_within_a_bucket() {
        let requests = vec![
            request_with_status("newest", StatusValue::Known(RequestStatus::Calling)),
            request_with_status("older", StatusValue::Known(RequestStatus::InProgress)),
        ];

        let board = partition(requests);
        assert_eq!(board.in_progress[0].id, "newest");
        assert_eq!(board.in_progress[1].id, "older");
    }

    #[test]
    fn empty_input_yields_empty_board() {
        assert!(partition(Vec::new()).is_empty());
    }
}
