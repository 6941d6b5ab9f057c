//! Two-variant outcome of a consumer call.

use crate::problem::ProblemDetails;

/// Either the deserialized payload or the problem the remote side reported.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Payload(T),
    Problem(ProblemDetails),
}

impl<T> ApiResponse<T> {
    pub fn is_payload(&self) -> bool {
        matches!(self, ApiResponse::Payload(_))
    }

    pub fn is_problem(&self) -> bool {
        matches!(self, ApiResponse::Problem(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            ApiResponse::Payload(payload) => Some(payload),
            ApiResponse::Problem(_) => None,
        }
    }

    pub fn problem(&self) -> Option<&ProblemDetails> {
        match self {
            ApiResponse::Payload(_) => None,
            ApiResponse::Problem(problem) => Some(problem),
        }
    }

    pub fn into_result(self) -> Result<T, ProblemDetails> {
        match self {
            ApiResponse::Payload(payload) => Ok(payload),
            ApiResponse::Problem(problem) => Err(problem),
        }
    }

    /// Split into the `(payload, problem)` pair; exactly one side is `Some`.
    pub fn into_parts(self) -> (Option<T>, Option<ProblemDetails>) {
        match self {
            ApiResponse::Payload(payload) => (Some(payload), None),
            ApiResponse::Problem(problem) => (None, Some(problem)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            ApiResponse::Payload(payload) => ApiResponse::Payload(f(payload)),
            ApiResponse::Problem(problem) => ApiResponse::Problem(problem),
        }
    }
}

impl<T> From<Result<T, ProblemDetails>> for ApiResponse<T> {
    fn from(result: Result<T, ProblemDetails>) -> Self {
        match result {
            Ok(payload) => ApiResponse::Payload(payload),
            Err(problem) => ApiResponse::Problem(problem),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_side_only() {
        let response: ApiResponse<u32> = ApiResponse::Payload(7);
        assert!(response.is_payload());
        assert_eq!(response.payload(), Some(&7));
        assert!(response.problem().is_none());
        assert_eq!(response.into_parts(), (Some(7), None));
    }

    #[test]
    fn problem_side_only() {
        let problem = ProblemDetails::new(500, "Internal Server Error");
        let response: ApiResponse<u32> = ApiResponse::Problem(problem.clone());
        assert!(response.is_problem());
        assert!(response.payload().is_none());
        assert_eq!(response.clone().into_result(), Err(problem.clone()));
        assert_eq!(response.into_parts(), (None, Some(problem)));
    }

    #[test]
    fn map_leaves_problem_untouched() {
        let problem = ProblemDetails::new(404, "Not Found");
        let mapped = ApiResponse::<u32>::Problem(problem.clone()).map(|n| n * 2);
        assert_eq!(mapped, ApiResponse::Problem(problem));
        assert_eq!(ApiResponse::Payload(2).map(|n| n * 2), ApiResponse::Payload(4));
    }
}
