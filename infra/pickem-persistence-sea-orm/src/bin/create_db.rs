use sea_orm::{
    ConnectionTrait, DatabaseBackend, Schema,
    sea_query::{Index, MysqlQueryBuilder},
};
use pickem_persistence_sea_orm::{
    create_db_pool,
    entity::{access_request, account, group, membership, profile},
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let pool = create_db_pool().await;

    let schema = Schema::new(DatabaseBackend::MySql);
    let account_table = schema.create_table_from_entity(account::Entity);
    let profile_table = schema.create_table_from_entity(profile::Entity);
    let group_table = schema.create_table_from_entity(group::Entity);
    let membership_table = schema.create_table_from_entity(membership::Entity);
    let access_request_table = schema.create_table_from_entity(access_request::Entity);

    pool.execute(&account_table)
        .await
        .expect("Failed to create accounts table");
    pool.execute(&profile_table)
        .await
        .expect("Failed to create profiles table");
    pool.execute(&group_table)
        .await
        .expect("Failed to create groups table");
    pool.execute(&membership_table)
        .await
        .expect("Failed to create memberships table");
    pool.execute(&access_request_table)
        .await
        .expect("Failed to create access requests table");

    // The composite pair constraints are the authority for duplicate
    // membership/request writers.
    let membership_pair_index = Index::create()
        .name("uniq_membership_profile_group")
        .table(membership::Entity)
        .col(membership::Column::ProfileId)
        .col(membership::Column::GroupId)
        .unique()
        .to_owned();
    let request_pair_index = Index::create()
        .name("uniq_access_request_profile_group")
        .table(access_request::Entity)
        .col(access_request::Column::ProfileId)
        .col(access_request::Column::GroupId)
        .unique()
        .to_owned();

    pool.execute_unprepared(&membership_pair_index.to_string(MysqlQueryBuilder))
        .await
        .expect("Failed to create membership pair index");
    pool.execute_unprepared(&request_pair_index.to_string(MysqlQueryBuilder))
        .await
        .expect("Failed to create access request pair index");

    println!("Created database tables successfully");
}
