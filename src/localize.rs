// Display-name tables and card decoration (banners, colours, logos).
//
// Keys are matched exactly as the upstream APIs send them, trailing
// spaces included. Unknown keys pass through unchanged.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::game::Game;

type Table = HashMap<&'static str, &'static str>;

lazy_static! {
    static ref WEAPON_CATEGORIES: Table = HashMap::from([
        ("LMG", "轻机枪"),
        ("Assault Rifles", "突击步枪"),
        ("Sniper Rifles", "狙击步枪"),
        ("Carbines", "卡宾枪"),
        ("PDW", "冲锋枪"),
        ("DMR", "精确射手步枪"),
        ("Bolt Action", "狙击步枪"),
        ("Lever-Action Carbines", "多功能"),
        ("Shotguns", "霰弹枪"),
        ("Pistols", "手枪"),
        ("SMG", "冲锋枪"),
    ]);

    static ref VEHICLE_CATEGORIES: Table = HashMap::from([
        // bf2042
        ("Land", "地载"),
        ("Amphibious", "两栖载具"),
        ("In-World", "地图载具"),
        ("Plane", "空载"),
        ("Helicopter", "旋翼"),
        ("Stationary", "定点武器"),
        // bf6
        ("Surface - Light Ground Transport", "轻型地面运输"),
        ("Surface - Main Battle Tank", "主战坦克"),
        ("Surface - Infantry Fighting Vehicle", "步兵战车"),
        ("Surface - Mobile Anti-Air", "防空"),
        ("Surface - Transport", "运输"),
        ("Aircraft - Attack Helicopter", "武装直升机"),
        ("Aircraft - Attack Bomber", "攻击机"),
        ("Aircraft - Fighter Jet", "空优机"),
        ("Aircraft - Transport Helicopter", "运输机"),
    ]);

    static ref VEHICLE_NAMES: Table = HashMap::from([
        ("LATV4 Recon ", "轻型侦察车"),
        ("M5C  ", "博尔特"),
        ("EBAA Wildcat ", "小野猫 "),
        ("LCAA Hovercraft", "气垫船"),
        ("MAV ", "MAV"),
        ("F-35E Panther ", "F-35E"),
        ("SU-57 FELON", "SU-57"),
        ("MV38-Condor", "秃鹰"),
        ("MD540 Nightbird ", "夜莺"),
        ("AH-64GX Apache Warchief", "阿帕奇"),
        ("KA-52 Alligator", "KA-52"),
        ("Mi-240 Super Hind ", "超级雌鹿"),
        ("M10 Wolverine", "狼獾"),
        ("M4 Sherman", "谢尔曼"),
        ("9K22 Tunguska-M", "通古斯卡"),
        ("M1161 ITV", "咆哮者"),
        ("Mi-28 Havoc", "Mi-28"),
        ("Centurion C-RAM", "百夫长"),
        ("RAH-68 Huron", "肖肖尼"),
        ("YG-99 Hannibal", "汉尼拔"),
        ("SU-70", "德鲁格"),
    ]);

    static ref SOLDIER_CLASSES: Table = HashMap::from([
        ("Assault", "突击"),
        ("Engineer", "工程"),
        ("Support", "支援"),
        ("Recon", "侦察"),
    ]);

    static ref SOLDIER_NAMES: Table = HashMap::from([
        ("Mackay ", "麦凯"),
        ("Sundance ", "日舞"),
        ("Irish ", "爱尔兰佬"),
        ("Casper ", "卡斯帕"),
        ("Rao ", "拉奥"),
        ("Dozer ", "推土机"),
        ("Boris ", "鲍里斯"),
        ("Paik ", "智秀"),
        ("Lis", "莉斯"),
        ("Crawford", "克劳福德"),
        ("Zain", "扎因"),
        ("Blasco", "布拉斯科"),
        ("Falck ", "法尔克"),
    ]);

    static ref MODES: Table = HashMap::from([
        ("Strikepoint", "打击点"),
        ("Conquest", "征服"),
        ("Breakthrough", "突破"),
        ("Rush", "突袭"),
        ("Escalation", "全面升级"),
        ("Domination", "抢攻"),
        ("Team Deathmatch", "团队死斗"),
        ("BR Duos", "双人大逃杀"),
        ("Gauntlet", "试炼场"),
        ("Squad Deathmatch", "小队死斗"),
        ("King of the Hill", "山丘之王"),
        ("Payload", "Payload"),
        ("BR Quads", "四人大逃杀"),
    ]);

    static ref MAPS: Table = HashMap::from([
        ("Operation Firestorm", "火线风暴"),
        ("Mirak Valley", "米拉克山谷"),
        ("Iberian Offensive", "伊比利亚攻势"),
        ("Liberation Peak", "解放峰"),
        ("Saints Quarter", "圣徒区"),
        ("Empire State", "帝国之洲"),
        ("Siege of Cairo", "开罗围城"),
        ("Manhattan Bridge", "曼哈顿大桥"),
        ("New Sobek City", "新索贝克城"),
        ("Blackwell Fields", "布莱克威尔原野"),
    ]);
}

fn lookup(table: &Table, key: &str) -> String {
    table.get(key).copied().unwrap_or(key).to_string()
}

pub fn weapon_category(name: &str) -> String {
    lookup(&WEAPON_CATEGORIES, name)
}

pub fn vehicle_category(name: &str) -> String {
    lookup(&VEHICLE_CATEGORIES, name)
}

pub fn vehicle_name(name: &str) -> String {
    lookup(&VEHICLE_NAMES, name)
}

pub fn soldier_class(name: &str) -> String {
    lookup(&SOLDIER_CLASSES, name)
}

pub fn soldier_name(name: &str) -> String {
    lookup(&SOLDIER_NAMES, name)
}

pub fn mode_name(name: &str) -> String {
    lookup(&MODES, name)
}

pub fn map_name(name: &str) -> String {
    lookup(&MAPS, name)
}

// ── Card decoration ──────────────────────────────────────────────────

/// Background colour of the card body, per game.
pub fn background_color(game: Game) -> &'static str {
    match game {
        Game::Bf4 => "rgba(18, 36, 52, 0.9)",
        Game::Bf1 => "rgba(66, 47, 29, 0.9)",
        Game::Bfv => "rgba(32, 37, 44, 0.9)",
        Game::Bf2042 => "rgba(20, 41, 58, 0.9)",
        Game::Bf6 => "rgba(28, 30, 26, 0.9)",
    }
}

/// Image URLs for card decoration, rooted at a configurable asset host.
#[derive(Debug, Clone)]
pub struct Assets {
    base_url: String,
}

impl Assets {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn banner(&self, game: Game) -> String {
        format!("{}/banners/{}.jpg", self.base_url, game.code())
    }

    /// bf6 cards use a banner for the player's favourite class.
    /// `class` is the localized class name of the top soldier entry.
    pub fn bf6_banner(&self, class: Option<&str>) -> String {
        let slug = match class {
            Some("突击") => "assault",
            Some("工程") => "engineer",
            Some("支援") => "support",
            Some("侦察") => "recon",
            _ => return self.banner(Game::Bf6),
        };
        format!("{}/banners/bf6_{slug}.jpg", self.base_url)
    }

    pub fn logo(&self, game: Game) -> String {
        format!("{}/logos/{}.png", self.base_url, game.code())
    }

    pub fn default_avatar(&self) -> String {
        format!("{}/avatar/default.png", self.base_url)
    }

    pub fn bf6_background(&self) -> String {
        format!("{}/backgrounds/bf6.jpg", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_translate() {
        assert_eq!(weapon_category("Assault Rifles"), "突击步枪");
        assert_eq!(vehicle_category("Surface - Main Battle Tank"), "主战坦克");
        assert_eq!(vehicle_name("M5C  "), "博尔特");
        assert_eq!(soldier_class("Recon"), "侦察");
        assert_eq!(soldier_name("Lis"), "莉斯");
        assert_eq!(mode_name("Conquest"), "征服");
        assert_eq!(map_name("Siege of Cairo"), "开罗围城");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(weapon_category("Railguns"), "Railguns");
        assert_eq!(vehicle_name("M5C"), "M5C");
        assert_eq!(map_name("Unknown Map"), "Unknown Map");
    }

    #[test]
    fn test_asset_urls() {
        let assets = Assets::new("https://cdn.example.com/bf/");
        assert_eq!(assets.banner(Game::Bfv), "https://cdn.example.com/bf/banners/bfv.jpg");
        assert_eq!(
            assets.bf6_banner(Some("支援")),
            "https://cdn.example.com/bf/banners/bf6_support.jpg"
        );
        assert_eq!(assets.bf6_banner(None), assets.banner(Game::Bf6));
        assert_eq!(assets.logo(Game::Bf1), "https://cdn.example.com/bf/logos/bf1.png");
    }
}
