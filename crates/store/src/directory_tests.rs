// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn registering_the_same_computer_twice_updates_in_place() {
    let store = Store::open_in_memory().await.unwrap();
    let id = ComputerId::new();
    let first = Computer {
        id,
        hostname: "box-1".into(),
        label: "laptop".into(),
        last_seen_at: Utc::now(),
    };
    store.register_computer(&first).await.unwrap();

    let mut second = first.clone();
    second.label = "desktop".into();
    store.register_computer(&second).await.unwrap();

    let listed = store.list_computers().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].label, "desktop");
}

#[tokio::test]
async fn projects_and_channels_round_trip() {
    let store = Store::open_in_memory().await.unwrap();
    let project = Project {
        id: ProjectId::new(),
        path: "/srv/app".into(),
        label: "app".into(),
    };
    store.create_project(&project).await.unwrap();
    assert_eq!(store.list_projects().await.unwrap(), vec![project]);

    let channel = Channel {
        id: ChannelId::new(),
        adapter_name: "telegram".into(),
        external_id: "-100123".into(),
        label: "ops-room".into(),
    };
    store.create_channel(&channel).await.unwrap();
    assert_eq!(store.get_channel(&channel.id).await.unwrap(), Some(channel));
}

#[tokio::test]
async fn registering_the_same_person_twice_updates_in_place() {
    let store = Store::open_in_memory().await.unwrap();
    let id = PersonId::new();
    let first = Person {
        id,
        display_name: "Jamie".into(),
        human_role: HumanRole::Member,
        default_system_role: SystemRole::Worker,
    };
    store.register_person(&first).await.unwrap();

    let mut second = first.clone();
    second.human_role = HumanRole::Admin;
    store.register_person(&second).await.unwrap();

    let loaded = store.get_person(&id).await.unwrap().unwrap();
    assert_eq!(loaded.human_role, HumanRole::Admin);
    assert_eq!(store.list_people().await.unwrap(), vec![loaded]);
}
