//! Static profile data for the site owner.
//!
//! Consumed once by the assistant to build its persona instruction and by the
//! web shell to render the hero and the achievements grid. Never mutated.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Ai,
    Entrepreneurship,
    Honors,
    Education,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Ai => "AI",
            Category::Entrepreneurship => "Entrepreneurship",
            Category::Honors => "Honors",
            Category::Education => "Education",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Ai => "🧠",
            Category::Entrepreneurship => "🚀",
            Category::Honors => "🏆",
            Category::Education => "📖",
        }
    }

    /// Accent color class used by the achievements grid.
    pub fn accent(self) -> &'static str {
        match self {
            Category::Ai => "accent-cyan",
            Category::Entrepreneurship => "accent-indigo",
            Category::Honors => "accent-amber",
            Category::Education => "accent-emerald",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Ai,
            Category::Entrepreneurship,
            Category::Honors,
            Category::Education,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
    pub title: &'static str,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub name: &'static str,
    pub age: u32,
    pub location: &'static str,
    pub motto: &'static str,
    pub bio: &'static str,
}

pub const OWNER: Profile = Profile {
    name: "牛渝文",
    age: 21,
    location: "西安",
    motto: "AI、创业者、国学爱好者",
    bio: "实战派青年创业联盟联合创始人，深耕AI青少年教育与校园流量运营，致力于将前沿AI技术与中国传统文化智慧相结合。",
};

const fn a(title: &'static str, category: Category) -> Achievement {
    Achievement { title, category }
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    a("实战派青年创业联盟联合创始人", Category::Entrepreneurship),
    a("深圳咪豆科技有限公司创始团队 (青少年AI教育)", Category::Ai),
    a("校园VC 数创精英班二期优秀学员", Category::Education),
    a("讯飞星火大模型开发者大赛参与者", Category::Ai),
    a("Mindverse (HongKong) 校园大使", Category::Ai),
    a("脱单盲盒操盘手 / 校园流量1w+", Category::Entrepreneurship),
    a("校园AI项目累计变现上万", Category::Ai),
    a("省级奖项 × 1", Category::Honors),
    a("北大西安创业训练营学员", Category::Education),
    a("中小企业AI增长顾问", Category::Entrepreneurship),
    a("校园VC 投资经理", Category::Entrepreneurship),
    a("中国青年报线上访谈嘉宾", Category::Honors),
    a("国学社社长", Category::Education),
    a("Datawhale 线下分享嘉宾", Category::Ai),
    a("校级课题研究参与者", Category::Education),
];

/// The fixed system instruction sent with every assistant request.
pub fn persona_instruction(profile: &Profile, achievements: &[Achievement]) -> String {
    let titles = achievements
        .iter()
        .map(|a| a.title)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "你是{name}的 AI 个人助手。\n\
         请基于以下背景信息回答用户的问题：\n\
         - 姓名：{name}\n\
         - 年龄：{age}\n\
         - 所在地：{location}\n\
         - 身份：{motto}\n\
         - 简介：{bio}\n\
         - 成就：{titles}\n\
         \n\
         你的风格应该是专业、睿智、充满活力且有礼貌的。\n\
         你的目标是展示{name}在 AI 创业、校园社群运营以及国学方面的深厚积淀。\n\
         如果使用了网络搜索结果，请在回答中保持准确，不要编造来源。",
        name = profile.name,
        age = profile.age,
        location = profile.location,
        motto = profile.motto,
        bio = profile.bio,
    )
}

/// Achievements grouped in [`Category::all`] order, skipping empty groups.
pub fn by_category(achievements: &[Achievement]) -> Vec<(Category, Vec<Achievement>)> {
    Category::all()
        .iter()
        .filter_map(|&cat| {
            let items: Vec<Achievement> = achievements
                .iter()
                .copied()
                .filter(|a| a.category == cat)
                .collect();
            (!items.is_empty()).then_some((cat, items))
        })
        .collect()
}
