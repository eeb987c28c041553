// ── Shared schema fixtures for unit tests ──

use crate::map::{
    Catalog, DataMap, DbEntity, DbJoin, JoinCondition, ObjEntity, ToDependentPkSemantics,
    ToManySemantics,
};
use std::sync::Arc;

pub(crate) fn join(
    map: &DataMap,
    entities: [&str; 2],
    names: [Option<&str>; 2],
    to_many: ToManySemantics,
    to_dep_pk: ToDependentPkSemantics,
    pairs: &[(&str, &str)],
) -> DbJoin {
    let condition = match pairs {
        [(left, right)] => JoinCondition::single(*left, *right),
        _ => JoinCondition::multi(pairs.iter().copied()),
    };
    map.join_builder()
        .condition(condition)
        .entities(entities)
        .names(names)
        .to_many_semantics(to_many)
        .to_dep_pk_semantics(to_dep_pk)
        .build()
        .expect("fixture join")
}

/// The classic gallery schema, declared in dependency-hostile order.
pub(crate) fn gallery() -> DataMap {
    use ToDependentPkSemantics as Dep;
    use ToManySemantics::*;

    let mut map = DataMap::new("gallery")
        .with_db_entity(
            DbEntity::new("PAINTING_INFO")
                .with_primary_key(&["PAINTING_ID"])
                .with_columns(&["TEXT_REVIEW"]),
        )
        .with_db_entity(
            DbEntity::new("ARTIST_EXHIBIT").with_primary_key(&["ARTIST_ID", "EXHIBIT_ID"]),
        )
        .with_db_entity(
            DbEntity::new("PAINTING")
                .with_primary_key(&["PAINTING_ID"])
                .with_columns(&["ARTIST_ID", "GALLERY_ID", "PAINTING_TITLE", "ESTIMATED_PRICE"]),
        )
        .with_db_entity(
            DbEntity::new("EXHIBIT")
                .with_primary_key(&["EXHIBIT_ID"])
                .with_columns(&["GALLERY_ID", "OPENING_DATE", "CLOSING_DATE"]),
        )
        .with_db_entity(
            DbEntity::new("ARTIST")
                .with_primary_key(&["ARTIST_ID"])
                .with_columns(&["ARTIST_NAME", "DATE_OF_BIRTH"]),
        )
        .with_db_entity(
            DbEntity::new("GALLERY")
                .with_primary_key(&["GALLERY_ID"])
                .with_columns(&["GALLERY_NAME"]),
        );

    let joins = [
        join(
            &map,
            ["ARTIST", "PAINTING"],
            [Some("paintingArray"), Some("toArtist")],
            OneToMany,
            Dep::None,
            &[("ARTIST_ID", "ARTIST_ID")],
        ),
        join(
            &map,
            ["GALLERY", "PAINTING"],
            [Some("paintingArray"), Some("toGallery")],
            OneToMany,
            Dep::None,
            &[("GALLERY_ID", "GALLERY_ID")],
        ),
        join(
            &map,
            ["GALLERY", "EXHIBIT"],
            [Some("exhibitArray"), Some("toGallery")],
            OneToMany,
            Dep::None,
            &[("GALLERY_ID", "GALLERY_ID")],
        ),
        join(
            &map,
            ["ARTIST", "ARTIST_EXHIBIT"],
            [Some("artistExhibitArray"), Some("toArtist")],
            OneToMany,
            Dep::Left,
            &[("ARTIST_ID", "ARTIST_ID")],
        ),
        join(
            &map,
            ["EXHIBIT", "ARTIST_EXHIBIT"],
            [Some("artistExhibitArray"), Some("toExhibit")],
            OneToMany,
            Dep::Left,
            &[("EXHIBIT_ID", "EXHIBIT_ID")],
        ),
        join(
            &map,
            ["PAINTING", "PAINTING_INFO"],
            [Some("toPaintingInfo"), Some("painting")],
            OneToOne,
            Dep::Left,
            &[("PAINTING_ID", "PAINTING_ID")],
        ),
    ];
    for j in joins {
        map.add_join(j);
    }

    map.with_obj_entity(
        ObjEntity::new("Artist", "ARTIST")
            .with_attribute("artistName", "ARTIST_NAME")
            .with_attribute("dateOfBirth", "DATE_OF_BIRTH")
            .with_relationship("paintingArray", "Painting", "paintingArray")
            .with_relationship("artistExhibitArray", "ArtistExhibit", "artistExhibitArray")
            .with_relationship("exhibits", "Exhibit", "artistExhibitArray.toExhibit"),
    )
    .with_obj_entity(
        ObjEntity::new("Painting", "PAINTING")
            .with_attribute("paintingTitle", "PAINTING_TITLE")
            .with_attribute("estimatedPrice", "ESTIMATED_PRICE")
            .with_attribute("artistName", "toArtist.ARTIST_NAME")
            .with_relationship("toArtist", "Artist", "toArtist")
            .with_relationship("toGallery", "Gallery", "toGallery")
            .with_relationship("toPaintingInfo", "PaintingInfo", "toPaintingInfo"),
    )
    .with_obj_entity(
        ObjEntity::new("Gallery", "GALLERY")
            .with_attribute("galleryName", "GALLERY_NAME")
            .with_relationship("paintingArray", "Painting", "paintingArray")
            .with_relationship("exhibitArray", "Exhibit", "exhibitArray"),
    )
    .with_obj_entity(
        ObjEntity::new("Exhibit", "EXHIBIT")
            .with_attribute("openingDate", "OPENING_DATE")
            .with_attribute("closingDate", "CLOSING_DATE")
            .with_relationship("toGallery", "Gallery", "toGallery")
            .with_relationship("artistExhibitArray", "ArtistExhibit", "artistExhibitArray"),
    )
    .with_obj_entity(
        ObjEntity::new("ArtistExhibit", "ARTIST_EXHIBIT")
            .with_relationship("toArtist", "Artist", "toArtist")
            .with_relationship("toExhibit", "Exhibit", "toExhibit"),
    )
    .with_obj_entity(
        ObjEntity::new("PaintingInfo", "PAINTING_INFO")
            .with_attribute("textReview", "TEXT_REVIEW")
            .with_relationship("painting", "Painting", "painting"),
    )
}

/// A self-referencing tree table.
pub(crate) fn categories() -> DataMap {
    let mut map = DataMap::new("categories").with_db_entity(
        DbEntity::new("CATEGORY")
            .with_primary_key(&["CATEGORY_ID"])
            .with_columns(&["PARENT_ID", "NAME"]),
    );
    let parent = join(
        &map,
        ["CATEGORY", "CATEGORY"],
        [Some("children"), Some("parent")],
        ToManySemantics::OneToMany,
        ToDependentPkSemantics::None,
        &[("CATEGORY_ID", "PARENT_ID")],
    );
    map.add_join(parent);
    map.with_obj_entity(
        ObjEntity::new("Category", "CATEGORY")
            .with_attribute("name", "NAME")
            .with_relationship("parent", "Category", "parent")
            .with_relationship("children", "Category", "children"),
    )
}

pub(crate) fn gallery_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_data_map(gallery()).expect("gallery catalog"))
}
