use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(string_len(User::Username, 50).primary_key())
                    .col(string_len(User::Email, 255).default(""))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contest::Table)
                    .if_not_exists()
                    .col(pk_auto(Contest::Id))
                    .col(string_len(Contest::Title, 200))
                    .col(text(Contest::Description))
                    .col(timestamp_with_time_zone(Contest::StartTime))
                    .col(timestamp_with_time_zone(Contest::EndTime))
                    // Free-form list of fields asked for at registration, e.g. "Team, University".
                    .col(text(Contest::RegistrationConfig))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Registration::Table)
                    .if_not_exists()
                    .col(pk_auto(Registration::Id))
                    .col(string_len(Registration::UserId, 50))
                    .col(integer(Registration::ContestId))
                    .col(
                        timestamp_with_time_zone(Registration::RegisteredAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(text(Registration::ExtraInfo))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-registration-contest_id")
                            .from(Registration::Table, Registration::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_registration_user_contest")
                    .table(Registration::Table)
                    .col(Registration::UserId)
                    .col(Registration::ContestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Problem::Table)
                    .if_not_exists()
                    .col(pk_auto(Problem::Id))
                    // NULL for practice problems.
                    .col(integer_null(Problem::ContestId))
                    .col(string_len(Problem::Title, 200))
                    .col(text(Problem::Description))
                    .col(text(Problem::Input))
                    .col(text(Problem::Output))
                    .col(text(Problem::Template))
                    .col(text(Problem::RunnerCode))
                    // 0=easy, 1=medium, 2=hard
                    .col(
                        small_integer(Problem::Difficulty)
                            .check(Expr::col(Problem::Difficulty).gte(0))
                            .check(Expr::col(Problem::Difficulty).lte(2)),
                    )
                    .col(integer(Problem::Points).default(0))
                    .col(text_null(Problem::SignatureJson))
                    .col(text_null(Problem::TestCasesJson))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-problem-contest_id")
                            .from(Problem::Table, Problem::ContestId)
                            .to(Contest::Table, Contest::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(pk_auto(Submission::Id))
                    // Submitters are not required to have a user row.
                    .col(string_len(Submission::UserId, 50))
                    .col(integer(Submission::ProblemId))
                    // 0=passed, 1=failed
                    .col(
                        small_integer(Submission::Status)
                            .check(Expr::col(Submission::Status).gte(0))
                            .check(Expr::col(Submission::Status).lte(1)),
                    )
                    .col(
                        timestamp_with_time_zone(Submission::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission-problem_id")
                            .from(Submission::Table, Submission::ProblemId)
                            .to(Problem::Table, Problem::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_user_id")
                    .table(Submission::Table)
                    .col(Submission::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_problem_id")
                    .table(Submission::Table)
                    .col(Submission::ProblemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_created_at")
                    .table(Submission::Table)
                    .col(Submission::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Problem::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Registration::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Contest::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Username,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Contest {
    Table,
    Id,
    Title,
    Description,
    StartTime,
    EndTime,
    RegistrationConfig,
}

#[derive(DeriveIden)]
enum Registration {
    Table,
    Id,
    UserId,
    ContestId,
    RegisteredAt,
    ExtraInfo,
}

#[derive(DeriveIden)]
enum Problem {
    Table,
    Id,
    ContestId,
    Title,
    Description,
    Input,
    Output,
    Template,
    RunnerCode,
    Difficulty,
    Points,
    SignatureJson,
    TestCasesJson,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    UserId,
    ProblemId,
    Status,
    CreatedAt,
}
