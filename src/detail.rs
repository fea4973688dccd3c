//! Detail view assembly
//!
//! Builds the content of the detail modal for one item: every field in
//! source order, with reference URLs replaced by resolved names.

use crate::swapi::resource::{classify, field_text, primary_label, FieldValue};
use crate::swapi::{ReferenceResolver, ResourceItem};

/// Title used when an item has no display name
const FALLBACK_TITLE: &str = "Details";

/// Text for an empty list field
const NONE_TEXT: &str = "None";

/// Separator between resolved names of a list field
const NAME_SEPARATOR: &str = ", ";

const POSTER_PLACEHOLDER: &str =
    "https://via.placeholder.com/300x200/000000/f4e87c?text=Poster+Not+Found";
const CHARACTER_PLACEHOLDER: &str =
    "https://via.placeholder.com/300x200/000000/f4e87c?text=Character";

/// Theatrical posters by episode number
const FILM_POSTERS: [(u64, &str); 6] = [
    (1, "https://upload.wikimedia.org/wikipedia/en/4/40/Star_Wars_Phantom_Menace_poster.jpg"),
    (2, "https://upload.wikimedia.org/wikipedia/en/3/32/Star_Wars_-_Episode_II_Attack_of_the_Clones_%28movie_poster%29.jpg"),
    (3, "https://upload.wikimedia.org/wikipedia/en/9/93/Star_Wars_Episode_III_Revenge_of_the_Sith_poster.jpg"),
    (4, "https://upload.wikimedia.org/wikipedia/en/8/87/StarWarsMoviePoster1977.jpg"),
    (5, "https://upload.wikimedia.org/wikipedia/en/3/3c/SW_-_Empire_Strikes_Back.jpg"),
    (6, "https://upload.wikimedia.org/wikipedia/en/b/b2/ReturnOfTheJediPoster1983.jpg"),
];

/// Artwork linked from the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Illustration {
    /// Poster for a known episode
    FilmPoster(&'static str),
    /// A film whose episode has no poster on file
    PosterPlaceholder,
    /// Generic image for named resources
    CharacterPlaceholder,
}

impl Illustration {
    /// Picks the artwork for an item, if any
    ///
    /// Films (items with both `title` and `episode_id`) get their poster;
    /// anything with a `name` gets the character placeholder.
    pub fn for_item(item: &ResourceItem) -> Option<Self> {
        let title = field_text(item, "title");
        let episode = item.get("episode_id").and_then(episode_number);

        match (title, episode) {
            (Some(_), Some(episode)) => Some(
                poster_for_episode(episode)
                    .map(Illustration::FilmPoster)
                    .unwrap_or(Illustration::PosterPlaceholder),
            ),
            _ if field_text(item, "name").is_some() => Some(Illustration::CharacterPlaceholder),
            _ => None,
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            Illustration::FilmPoster(url) => url,
            Illustration::PosterPlaceholder => POSTER_PLACEHOLDER,
            Illustration::CharacterPlaceholder => CHARACTER_PLACEHOLDER,
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Illustration::FilmPoster(_) | Illustration::PosterPlaceholder => "Poster",
            Illustration::CharacterPlaceholder => "Image",
        }
    }
}

fn episode_number(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().filter(|n| *n != 0),
        serde_json::Value::String(s) => s.trim().parse().ok().filter(|n| *n != 0),
        _ => None,
    }
}

fn poster_for_episode(episode: u64) -> Option<&'static str> {
    FILM_POSTERS
        .iter()
        .find(|(id, _)| *id == episode)
        .map(|(_, url)| *url)
}

/// One labelled line of the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: String,
    pub value: String,
}

/// Everything the detail modal shows for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub illustration: Option<Illustration>,
    pub fields: Vec<DetailField>,
}

/// Builds the detail view for an item
///
/// Fields are processed one after another in source order. Within a list
/// field all references resolve concurrently and are joined in input order.
/// Single reference URLs are replaced by their resolved name. Resolution
/// failures show up as sentinel text and never abort the view.
pub async fn present(item: &ResourceItem, key: &str, resolver: &ReferenceResolver) -> DetailView {
    let title = primary_label(item, key).unwrap_or_else(|| FALLBACK_TITLE.to_string());

    let mut fields = Vec::with_capacity(item.len());
    for (label, value) in item {
        let text = match classify(value) {
            FieldValue::List([]) => NONE_TEXT.to_string(),
            FieldValue::List(values) => resolver.resolve_all(values).await.join(NAME_SEPARATOR),
            FieldValue::Reference(_) => resolver.resolve_name(value).await,
            FieldValue::Plain(text) => text,
        };
        fields.push(DetailField {
            label: label.clone(),
            value: text,
        });
    }

    DetailView {
        title,
        illustration: Illustration::for_item(item),
        fields,
    }
}
