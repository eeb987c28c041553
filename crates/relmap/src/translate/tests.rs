use super::*;
use crate::map::Catalog;
use crate::testing::gallery_catalog;
use std::sync::Arc;
use std::thread;

fn translator() -> (Arc<Catalog>, PathTranslator) {
    let catalog = gallery_catalog();
    let context = Arc::new(TranslatorContext::new(Arc::clone(&catalog)));
    (catalog, PathTranslator::new(context))
}

fn joins(translator: &PathTranslator) -> Vec<(String, String, JoinType)> {
    translator
        .context()
        .table_tree()
        .joins()
        .iter()
        .map(|n| (n.path().to_string(), n.alias().to_string(), n.join_type()))
        .collect()
}

fn join(path: &str, alias: &str, join_type: JoinType) -> (String, String, JoinType) {
    (path.to_string(), alias.to_string(), join_type)
}

#[test]
fn test_segment_syntax() {
    let seg = PathSegment::parse("toArtist#a+").unwrap();
    assert_eq!(seg.name, "toArtist");
    assert_eq!(seg.alias, Some("a"));
    assert!(seg.outer);
    assert_eq!(seg.to_string(), "toArtist#a+");

    let plain = PathSegment::parse("toArtist").unwrap();
    assert!(!plain.has_markers());
    assert_eq!(plain.with_name("toGallery").to_string(), "toGallery");
    assert_eq!(seg.with_name("toGallery").to_string(), "toGallery#a+");

    for bad in ["", "+", "#a", "a#", "a+b", "a++", "a#b#c"] {
        assert!(PathSegment::parse(bad).unwrap_err().is_invalid_path(), "{bad}");
    }
    assert!(split_path("").unwrap_err().is_invalid_path());
    assert_eq!(split_path("a.b+.c").unwrap().len(), 3);
}

#[test]
fn test_table_tree_assigns_aliases_once() {
    let catalog = gallery_catalog();
    let rel = catalog.relationship("PAINTING", "toArtist").unwrap();
    let mut tree = TableTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.root().alias(), "t0");
    assert!(tree.add_join_table("toArtist", rel, JoinType::Inner));
    assert!(!tree.add_join_table("toArtist", rel, JoinType::LeftOuter));
    assert!(tree.add_join_table("toArtist#x", rel, JoinType::LeftOuter));
    assert_eq!(tree.alias("toArtist"), Some("t1"));
    assert_eq!(tree.alias("toArtist#x"), Some("t2"));
    assert_eq!(tree.node("toArtist").unwrap().join_type(), JoinType::Inner);
    assert_eq!(tree.node("toArtist").unwrap().relationship(), Some(rel));
    assert_eq!(tree.len(), 3);
}

#[test]
fn test_db_attribute_on_root() {
    let (catalog, translator) = translator();
    let painting = catalog.db_entity("PAINTING").unwrap();
    let result = translator
        .translate_db_path(painting, "PAINTING_TITLE", None, false)
        .unwrap();
    assert_eq!(result.final_path(), "PAINTING_TITLE");
    assert!(matches!(result.terminal(), PathTerminal::Attribute(a) if a.name == "PAINTING_TITLE"));
    assert!(result.db_relationship().is_none());
    assert_eq!(translator.context().join_count(), 0);
}

#[test]
fn test_db_path_joins_intermediate_relationships() {
    let (catalog, translator) = translator();
    let painting = catalog.db_entity("PAINTING").unwrap();
    let result = translator
        .translate_db_path(painting, "toArtist.ARTIST_NAME", None, false)
        .unwrap();
    assert_eq!(result.final_path(), "toArtist.ARTIST_NAME");
    assert_eq!(result.attribute_paths(), ["toArtist.ARTIST_NAME"]);
    assert_eq!(joins(&translator), [join("toArtist", "t1", JoinType::Inner)]);
}

#[test]
fn test_terminal_to_one_resolves_to_foreign_key() {
    let (catalog, translator) = translator();
    let painting = catalog.db_entity("PAINTING").unwrap();
    let result = translator
        .translate_db_path(painting, "toArtist", None, false)
        .unwrap();
    assert_eq!(result.final_path(), "toArtist");
    assert!(!result.is_joined());
    assert_eq!(result.db_relationship().unwrap().name(), "toArtist");
    assert_eq!(result.attribute_paths(), ["ARTIST_ID"]);
    assert!(!result.attributes()[0].primary_key);
    assert_eq!(translator.context().join_count(), 0);
}

#[test]
fn test_flattened_db_path_joins_terminal_relationship() {
    let (catalog, translator) = translator();
    let painting = catalog.db_entity("PAINTING").unwrap();
    let result = translator
        .translate_db_path(painting, "toArtist", None, true)
        .unwrap();
    assert!(result.is_joined());
    assert_eq!(result.attribute_paths(), ["toArtist.ARTIST_ID"]);
    assert!(result.attributes()[0].primary_key);
    assert_eq!(joins(&translator), [join("toArtist", "t1", JoinType::Inner)]);
}

#[test]
fn test_terminal_to_many_is_joined() {
    let (catalog, translator) = translator();
    let artist = catalog.db_entity("ARTIST").unwrap();
    let result = translator
        .translate_db_path(artist, "paintingArray", None, false)
        .unwrap();
    assert!(result.is_joined());
    assert_eq!(result.final_path(), "paintingArray");
    assert_eq!(result.attribute_paths(), ["paintingArray.PAINTING_ID"]);
    assert_eq!(joins(&translator), [join("paintingArray", "t1", JoinType::Inner)]);
}

#[test]
fn test_outer_and_split_markers() {
    let (catalog, translator) = translator();
    let painting = catalog.db_entity("PAINTING").unwrap();
    translator
        .translate_db_path(painting, "toArtist#a+.ARTIST_NAME", None, false)
        .unwrap();
    let result = translator
        .translate_db_path(painting, "toArtist#b.ARTIST_NAME", None, false)
        .unwrap();
    assert_eq!(result.final_path(), "toArtist#b.ARTIST_NAME");
    assert_eq!(
        joins(&translator),
        [
            join("toArtist#a+", "t1", JoinType::LeftOuter),
            join("toArtist#b", "t2", JoinType::Inner),
        ]
    );
}

#[test]
fn test_parent_path_prefixes_joins() {
    let (catalog, translator) = translator();
    let artist = catalog.db_entity("ARTIST").unwrap();
    let result = translator
        .translate_db_path(
            artist,
            "paintingArray.toGallery.GALLERY_NAME",
            Some("owner"),
            false,
        )
        .unwrap();
    assert_eq!(
        result.final_path(),
        "owner.paintingArray.toGallery.GALLERY_NAME"
    );
    assert_eq!(
        joins(&translator),
        [
            join("owner.paintingArray", "t1", JoinType::Inner),
            join("owner.paintingArray.toGallery", "t2", JoinType::Inner),
        ]
    );
}

#[test]
fn test_object_attribute_follows_its_db_path() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();

    let title = translator
        .translate_path(painting, "paintingTitle", None)
        .unwrap();
    assert_eq!(title.final_path(), "PAINTING_TITLE");

    let artist_name = translator
        .translate_path(painting, "artistName", None)
        .unwrap();
    assert_eq!(artist_name.final_path(), "toArtist.ARTIST_NAME");
    assert_eq!(joins(&translator), [join("toArtist", "t1", JoinType::Inner)]);
}

#[test]
fn test_flattened_object_relationship() {
    let (catalog, translator) = translator();
    let artist = catalog.obj_entity("Artist").unwrap();

    let exhibits = translator.translate_path(artist, "exhibits", None).unwrap();
    assert_eq!(exhibits.final_path(), "artistExhibitArray.toExhibit");
    assert_eq!(exhibits.db_relationship().unwrap().name(), "toExhibit");
    assert_eq!(exhibits.attribute_paths(), ["artistExhibitArray.EXHIBIT_ID"]);
    assert_eq!(
        joins(&translator),
        [join("artistExhibitArray", "t1", JoinType::Inner)]
    );

    let gallery = translator
        .translate_path(artist, "exhibits.toGallery.galleryName", None)
        .unwrap();
    assert_eq!(
        gallery.final_path(),
        "artistExhibitArray.toExhibit.toGallery.GALLERY_NAME"
    );
    assert_eq!(
        joins(&translator),
        [
            join("artistExhibitArray", "t1", JoinType::Inner),
            join("artistExhibitArray.toExhibit", "t2", JoinType::Inner),
            join("artistExhibitArray.toExhibit.toGallery", "t3", JoinType::Inner),
        ]
    );
}

#[test]
fn test_outer_marker_applies_to_every_hop_of_a_flattened_relationship() {
    let (catalog, translator) = translator();
    let artist = catalog.obj_entity("Artist").unwrap();
    let result = translator
        .translate_path(artist, "exhibits+.openingDate", None)
        .unwrap();
    assert_eq!(
        result.final_path(),
        "artistExhibitArray+.toExhibit+.OPENING_DATE"
    );
    assert_eq!(
        joins(&translator),
        [
            join("artistExhibitArray+", "t1", JoinType::LeftOuter),
            join("artistExhibitArray+.toExhibit+", "t2", JoinType::LeftOuter),
        ]
    );
}

#[test]
fn test_flattened_relationship_in_the_middle_of_a_path_joins_every_hop() {
    let (catalog, translator) = translator();
    let artist = catalog.obj_entity("Artist").unwrap();
    let result = translator
        .translate_path(artist, "exhibits#e.toGallery", None)
        .unwrap();
    assert_eq!(result.final_path(), "artistExhibitArray#e.toExhibit#e.toGallery");
    assert!(!result.is_joined());
    assert_eq!(
        result.attribute_paths(),
        ["artistExhibitArray#e.toExhibit#e.GALLERY_ID"]
    );
    assert_eq!(
        joins(&translator),
        [
            join("artistExhibitArray#e", "t1", JoinType::Inner),
            join("artistExhibitArray#e.toExhibit#e", "t2", JoinType::Inner),
        ]
    );
}

#[test]
fn test_malformed_and_unresolvable_paths() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();

    for bad in ["", "toArtist..artistName", "paintingTitle+", "toArtist.artistName#x"] {
        let err = translator.translate_path(painting, bad, None).unwrap_err();
        assert!(err.is_invalid_path(), "{bad}: {err}");
    }
    for unresolved in ["nope", "paintingTitle.toArtist", "toArtist.nope", "toGallery.toArtist"] {
        let err = translator
            .translate_path(painting, unresolved, None)
            .unwrap_err();
        assert!(err.is_path_resolution(), "{unresolved}: {err}");
    }
    assert_eq!(translator.context().join_count(), 0);
}

#[test]
fn test_results_are_cached_and_joins_not_repeated() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();

    let first = translator
        .translate_path(painting, "toArtist.artistName", None)
        .unwrap();
    let second = translator
        .translate_path(painting, "toArtist.artistName", None)
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(translator.context().join_count(), 1);

    let nested = translator
        .translate_path(painting, "toArtist.artistName", Some("p"))
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &nested));
    assert_eq!(nested.final_path(), "p.toArtist.ARTIST_NAME");

    let stats = translator.obj_cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.size, 2);
    assert!((stats.hit_ratio() - 1.0 / 3.0).abs() < 1e-9);
    assert_eq!(translator.db_cache_stats(), PathCacheStats::default());
}

#[test]
fn test_failures_are_memoized() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();
    let first = translator.translate_path(painting, "nope", None).unwrap_err();
    let second = translator.translate_path(painting, "nope", None).unwrap_err();
    assert_eq!(first, second);
    let stats = translator.obj_cache_stats();
    assert_eq!((stats.hits, stats.misses), (1, 1));
}

#[test]
fn test_id_path_on_root_entity() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();

    let result = translator.translate_id_path(painting, "PAINTING_ID").unwrap();
    assert_eq!(result.final_path(), "");
    assert_eq!(result.attribute_paths(), ["PAINTING_ID"]);
    assert!(matches!(result.terminal(), PathTerminal::Id(a) if a.primary_key));
    assert_eq!(translator.context().join_count(), 0);

    assert!(translator.translate_id_path(painting, "").unwrap_err().is_invalid_path());
    assert!(translator
        .translate_id_path(painting, "NOPE")
        .unwrap_err()
        .is_path_resolution());
}

#[test]
fn test_id_path_joins_the_last_relationship() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();

    translator.translate_path(painting, "toArtist", None).unwrap();
    assert_eq!(translator.context().join_count(), 0);

    let result = translator
        .translate_id_path(painting, "toArtist.ARTIST_ID")
        .unwrap();
    assert_eq!(result.final_path(), "toArtist");
    assert_eq!(result.attribute_paths(), ["toArtist.ARTIST_ID"]);
    assert_eq!(joins(&translator), [join("toArtist", "t1", JoinType::Inner)]);
}

#[test]
fn test_id_path_with_outer_marker_uses_left_outer_join() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();
    let result = translator
        .translate_id_path(painting, "toArtist+.ARTIST_ID")
        .unwrap();
    assert_eq!(result.final_path(), "toArtist+");
    assert_eq!(
        joins(&translator),
        [join("toArtist+", "t1", JoinType::LeftOuter)]
    );
}

#[test]
fn test_id_path_errors() {
    let (catalog, translator) = translator();
    let painting = catalog.obj_entity("Painting").unwrap();

    let err = translator
        .translate_id_path(painting, "paintingTitle.PAINTING_ID")
        .unwrap_err();
    assert!(err.is_path_resolution());
    assert!(err.to_string().contains("can't resolve relationship"));

    let err = translator
        .translate_id_path(painting, "toArtist.NOPE")
        .unwrap_err();
    assert!(err.to_string().contains("no such pk"));
}

#[test]
fn test_concurrent_translation_computes_once() {
    let (catalog, translator) = translator();
    let translator = Arc::new(translator);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let translator = Arc::clone(&translator);
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let artist = catalog.obj_entity("Artist").unwrap();
                translator
                    .translate_path(artist, "exhibits.toGallery.galleryName", None)
                    .unwrap()
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(translator.obj_cache_stats().misses, 1);
    assert_eq!(translator.context().join_count(), 3);
}
