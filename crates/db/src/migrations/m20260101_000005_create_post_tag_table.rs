//! Create post_tag join table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostTag::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostTag::Id).string_len(32).not_null().primary_key())
                    .col(ColumnDef::new(PostTag::PostId).string_len(32).not_null())
                    .col(ColumnDef::new(PostTag::TagId).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tag_post")
                            .from(PostTag::Table, PostTag::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_tag_tag")
                            .from(PostTag::Table, PostTag::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (post_id, tag_id) - associations are a set
        manager
            .create_index(
                Index::create()
                    .name("idx_post_tag_post_tag")
                    .table(PostTag::Table)
                    .col(PostTag::PostId)
                    .col(PostTag::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: tag_id (for listing a tag's posts)
        manager
            .create_index(
                Index::create()
                    .name("idx_post_tag_tag_id")
                    .table(PostTag::Table)
                    .col(PostTag::TagId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostTag::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostTag {
    Table,
    Id,
    PostId,
    TagId,
}

#[derive(Iden)]
enum Post {
    Table,
    Id,
}

#[derive(Iden)]
enum Tag {
    Table,
    Id,
}
