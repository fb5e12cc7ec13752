//! テストモード用のシードデータ。弘大周辺の店を題材にしている。

use crate::domain::entities::{BoardOwner, Bookmark, Post, StampBoard, User};
use crate::domain::value_objects::BoardColor;
use chrono::{DateTime, TimeZone, Utc};

fn fixture_date(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
}

pub fn seed_users() -> Vec<User> {
    vec![User {
        id: 1,
        email: "user@gmail.com".to_string(),
        nickname: "홍대 맛집 탐험가".to_string(),
    }]
}

pub fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            id: 1,
            title: "홍대 카페거리 맛집 탐방".to_string(),
            content: "홍대 카페거리에서 발견한 숨겨진 맛집들을 소개합니다. 특히 스타벅스 홍대점 근처에 있는 작은 카페들이 정말 맛있어요.".to_string(),
            address: "서울 마포구 홍대로 396".to_string(),
            latitude: 37.5519,
            longitude: 126.9255,
        },
        Post {
            id: 2,
            title: "홍대 포차거리 야식 추천".to_string(),
            content: "홍대 포차거리에서 먹을 수 있는 야식들을 정리했습니다. 밤늦게까지 영업해서 야식으로도 좋습니다.".to_string(),
            address: "서울 마포구 홍대로 123".to_string(),
            latitude: 37.5575,
            longitude: 126.92,
        },
        Post {
            id: 3,
            title: "홍대 우동 맛집 가미우동".to_string(),
            content: "홍대에 있는 가미우동에서 먹은 우동 후기입니다. 면발이 쫄깃하고 국물이 진해서 정말 맛있었어요.".to_string(),
            address: "서울 마포구 와우산로 123".to_string(),
            latitude: 37.5535,
            longitude: 126.935,
        },
        Post {
            id: 4,
            title: "홍대 치킨 맛집 발견".to_string(),
            content: "홍대 근처에서 발견한 치킨 맛집입니다. 양념치킨이 정말 맛있고 가격도 합리적이에요.".to_string(),
            address: "서울 마포구 와우산로 456".to_string(),
            latitude: 37.555,
            longitude: 126.932,
        },
        Post {
            id: 5,
            title: "홍대 피자 맛집 피자나라".to_string(),
            content: "홍대에 있는 피자나라에서 먹은 피자 후기입니다. 도우가 얇고 바삭해서 정말 맛있었어요.".to_string(),
            address: "서울 마포구 와우산로 789".to_string(),
            latitude: 37.5565,
            longitude: 126.928,
        },
        Post {
            id: 6,
            title: "홍대 일식집 우동집".to_string(),
            content: "홍대에 있는 우동집에서 먹은 일식 후기입니다. 우동뿐만 아니라 돈카츠도 정말 맛있었어요.".to_string(),
            address: "서울 마포구 홍대로 456".to_string(),
            latitude: 37.549,
            longitude: 126.93,
        },
        Post {
            id: 7,
            title: "홍대 디저트 맛집 탐방".to_string(),
            content: "홍대 근처에 있는 디저트 맛집들을 소개합니다. 커피와 함께 먹으면 더욱 맛있습니다.".to_string(),
            address: "서울 마포구 홍대로 789".to_string(),
            latitude: 37.548,
            longitude: 126.931,
        },
        Post {
            id: 8,
            title: "홍대 술집 추천".to_string(),
            content: "홍대 근처에 있는 술집들을 소개합니다. 특히 맥주가 맛있는 펍들이 많아요.".to_string(),
            address: "서울 마포구 홍대로 321".to_string(),
            latitude: 37.552,
            longitude: 126.929,
        },
    ]
}

pub fn seed_bookmarks() -> Vec<Bookmark> {
    vec![
        Bookmark {
            post_id: 1,
            title: "스타벅스".to_string(),
            address: "서울 마포구 홍대로 396".to_string(),
            latitude: 37.5519,
            longitude: 126.9255,
            visited: true,
        },
        Bookmark {
            post_id: 2,
            title: "투썸플레이스 홍대점".to_string(),
            address: "서울 마포구 홍대로 123".to_string(),
            latitude: 37.5575,
            longitude: 126.92,
            visited: false,
        },
        Bookmark {
            post_id: 3,
            title: "할리스 커피 홍대점".to_string(),
            address: "서울 마포구 홍대로 456".to_string(),
            latitude: 37.549,
            longitude: 126.93,
            visited: false,
        },
        Bookmark {
            post_id: 4,
            title: "맛있는 치킨집".to_string(),
            address: "서울 마포구 와우산로 123".to_string(),
            latitude: 37.5535,
            longitude: 126.935,
            visited: true,
        },
        Bookmark {
            post_id: 5,
            title: "피자나라".to_string(),
            address: "서울 마포구 와우산로 456".to_string(),
            latitude: 37.555,
            longitude: 126.932,
            visited: false,
        },
        Bookmark {
            post_id: 6,
            title: "우동집".to_string(),
            address: "서울 마포구 와우산로 789".to_string(),
            latitude: 37.5565,
            longitude: 126.928,
            visited: true,
        },
    ]
}

pub fn seed_boards() -> Vec<StampBoard> {
    let bookmarks = seed_bookmarks();
    vec![
        StampBoard {
            id: 1,
            title: "카페 스탬프".to_string(),
            color: BoardColor::palette(0),
            created_at: fixture_date(1_704_067_200),
            owner: BoardOwner { id: 1 },
            bookmarks: bookmarks[0..3].to_vec(),
        },
        StampBoard {
            id: 2,
            title: "맛집 스탬프".to_string(),
            color: BoardColor::palette(1),
            created_at: fixture_date(1_704_326_400),
            owner: BoardOwner { id: 1 },
            bookmarks: bookmarks[3..5].to_vec(),
        },
        StampBoard {
            id: 3,
            title: "일식집 스탬프".to_string(),
            color: BoardColor::palette(2),
            created_at: fixture_date(1_704_672_000),
            owner: BoardOwner { id: 1 },
            bookmarks: bookmarks[5..6].to_vec(),
        },
    ]
}
