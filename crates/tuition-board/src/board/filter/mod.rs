mod criteria;
mod predicates;

pub use criteria::FilterCriteria;

use super::domain::Post;
use predicates::Needles;

/// Returns the posts that satisfy every active criterion, in their original order.
pub fn filter_posts<'a>(posts: &'a [Post], criteria: &FilterCriteria) -> Vec<&'a Post> {
    filter_indices(posts, criteria)
        .into_iter()
        .map(|index| &posts[index])
        .collect()
}

/// Positions of the matching posts within `posts`, ascending.
pub(crate) fn filter_indices(posts: &[Post], criteria: &FilterCriteria) -> Vec<usize> {
    let needles = Needles::from_criteria(criteria);
    posts
        .iter()
        .enumerate()
        .filter(|(_, post)| predicates::matches(post, criteria, &needles))
        .map(|(index, _)| index)
        .collect()
}

impl FilterCriteria {
    /// Check a single post against the criteria.
    pub fn matches(&self, post: &Post) -> bool {
        predicates::matches(post, self, &Needles::from_criteria(self))
    }
}
