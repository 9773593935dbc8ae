//! Well-known football team names and their provider ids.
//!
//! Keys are already normalized (lowercase, single spaces). A hit here
//! saves one search call against the per-minute quota.

use crate::types::TeamId;

pub(crate) const FOOTBALL_TEAM_IDS: &[(&str, TeamId)] = &[
    // EPL
    ("manchester united", 33), ("man utd", 33),
    ("newcastle united", 34), ("newcastle", 34),
    ("bournemouth", 35),
    ("fulham", 36),
    ("wolverhampton wanderers", 39), ("wolves", 39),
    ("liverpool", 40),
    ("southampton", 41),
    ("arsenal", 42),
    ("everton", 45),
    ("leicester city", 46), ("leicester", 46),
    ("tottenham hotspur", 47), ("tottenham", 47), ("spurs", 47),
    ("west ham united", 48), ("west ham", 48),
    ("chelsea", 49),
    ("manchester city", 50), ("man city", 50),
    ("brighton & hove albion", 51), ("brighton", 51),
    ("crystal palace", 52),
    ("brentford", 55),
    ("ipswich town", 57), ("ipswich", 57),
    ("leeds united", 63), ("leeds", 63),
    ("nottingham forest", 65), ("nottingham", 65),
    ("aston villa", 66),
    ("sheffield united", 62),
    ("burnley", 44),
    ("luton town", 1359),
    // Championship & Lower
    ("sunderland", 746),
    ("blackburn rovers", 68),
    ("west bromwich albion", 60),
    ("watford", 38),
    ("norwich city", 71),
    ("hull city", 67),
    ("coventry city", 1361),
    ("middlesbrough", 69),
    ("preston north end", 1357),
    ("bristol city", 1351),
    ("millwall", 1354),
    ("cardiff city", 720),
    ("swansea city", 74),
    ("stoke city", 70),
    ("qpr", 73), ("queens park rangers", 73),
    ("sheffield wednesday", 1360),
    ("plymouth argyle", 723),
    ("portsmouth", 1363),
    ("derby county", 58),
    ("oxford united", 1362),
    ("birmingham city", 32), ("birmingham", 32),
    ("charlton athletic", 64), ("charlton", 64),
    ("wigan athletic", 66), ("wigan", 66),
    ("blackpool", 61),
    ("reading", 54),
    ("bolton wanderers", 76), ("bolton", 76),
    ("barnsley", 75),
    ("peterborough united", 59), ("peterborough", 59),
    ("huddersfield town", 37), ("huddersfield", 37),
    ("rotherham united", 56), ("rotherham", 56),
    ("wrexham", 1339),
    ("stockport county", 1338),
    // La Liga
    ("real madrid", 541),
    ("barcelona", 529),
    ("atletico madrid", 530),
    ("sevilla", 536),
    ("real betis", 543),
    ("real sociedad", 548),
    ("villarreal", 533),
    ("athletic club", 531), ("athletic bilbao", 531),
    ("valencia", 532),
    ("girona", 547),
    ("celta vigo", 538),
    ("mallorca", 798),
    ("osasuna", 727),
    ("rayo vallecano", 728),
    ("alaves", 537),
    ("las palmas", 534),
    ("getafe", 546),
    ("granada", 539),
    ("cadiz", 724),
    ("almeria", 720),
    ("espanyol", 540),
    ("valladolid", 720), ("real valladolid", 720),
    ("leganes", 545),
    // Serie A
    ("inter milan", 505), ("inter", 505),
    ("ac milan", 489), ("milan", 489),
    ("juventus", 496),
    ("napoli", 492),
    ("as roma", 497), ("roma", 497),
    ("atalanta", 499),
    ("lazio", 487),
    ("fiorentina", 502),
    ("torino", 503),
    ("bologna", 500),
    ("monza", 1579),
    ("genoa", 495),
    ("lecce", 867),
    ("udinese", 494),
    ("hellas verona", 504), ("verona", 504),
    ("empoli", 511),
    ("sassuolo", 488),
    ("frosinone", 512),
    ("salernitana", 514),
    ("cagliari", 490),
    ("parma", 506),
    ("como", 518),
    ("venezia", 519),
    // Serie B
    ("cremonese", 520),
    ("pisa", 517),
    ("palermo", 515),
    ("sampdoria", 498),
    ("spezia", 516),
    ("bari", 528),
    ("brescia", 521),
    ("sudtirol", 3317),
    ("cittadella", 510),
    ("catanzaro", 907),
    ("cosenza", 857),
    ("modena", 501),
    ("reggiana", 894),
    // Bundesliga
    ("bayern munich", 157), ("bayern munchen", 157),
    ("borussia dortmund", 165), ("dortmund", 165),
    ("bayer leverkusen", 168), ("leverkusen", 168),
    ("rb leipzig", 173), ("leipzig", 173),
    ("vfb stuttgart", 172), ("stuttgart", 172),
    ("eintracht frankfurt", 169), ("frankfurt", 169),
    ("hoffenheim", 167),
    ("sc freiburg", 160), ("freiburg", 160),
    ("werder bremen", 162),
    ("augsburg", 170),
    ("wolfsburg", 161),
    ("borussia monchengladbach", 163), ("gladbach", 163),
    ("union berlin", 182),
    ("mainz 05", 164), ("mainz", 164),
    ("fc koln", 192), ("koln", 192),
    ("darmstadt 98", 185),
    ("vfl bochum", 176), ("bochum", 176),
    ("heidenheim", 180),
    ("st. pauli", 191), ("st pauli", 191),
    ("holstein kiel", 193),
    // Ligue 1
    ("paris saint germain", 85), ("psg", 85),
    ("monaco", 91), ("as monaco", 91),
    ("marseille", 81),
    ("lille", 79),
    ("lyon", 80),
    ("lens", 116),
    ("nice", 84),
    ("rennes", 94),
    ("reims", 93),
    ("toulouse", 96),
    ("strasbourg", 95),
    ("montpellier", 82),
    ("nantes", 83),
    ("le havre", 92),
    ("metz", 112),
    ("lorient", 97),
    ("clermont foot", 98),
    ("brest", 106),
    ("auxerre", 108),
    ("angers", 77),
    ("saint-etienne", 1063),
    // Eredivisie
    ("psv eindhoven", 197), ("psv", 197),
    ("feyenoord", 209),
    ("ajax", 194),
    ("az alkmaar", 200), ("az", 200),
    ("twente", 213), ("fc twente", 213),
    ("utrecht", 201),
    ("heerenveen", 206),
    // A-League
    ("melbourne city", 2957),
    ("melbourne victory", 2959),
    ("perth glory", 2963),
    ("adelaide united", 2955),
    ("western sydney wanderers", 2965), ("wsw", 2965),
    ("central coast mariners", 2954),
    ("sydney fc", 2964),
    ("brisbane roar", 2956),
    ("newcastle jets", 2962),
    ("wellington phoenix", 2966),
    ("macarthur fc", 5085),
    ("western united", 3192),
    ("auckland fc", 24823),
    // National
    ("south korea", 17),
    ("japan", 12),
    ("china", 10),
    ("australia", 20),
    ("iran", 22),
    ("saudi arabia", 23),
    ("qatar", 15),
    ("jordan", 26),
    ("iraq", 19),
    ("uzbekistan", 16),
    ("senegal", 13),
    ("dr congo", 113),
    ("egypt", 32),
    ("ivory coast", 14),
    ("nigeria", 18),
    ("cameroon", 37),
    ("ghana", 36),
    ("morocco", 31),
    ("algeria", 24),
    ("tunisia", 21),
    ("mali", 111),
    ("south africa", 38),
    ("burkina faso", 112),
    ("gabon", 115),
    ("mozambique", 116),
    ("guinea", 118),
    ("gambia", 117),
    ("angola", 114),
    ("france", 2),
    ("germany", 25),
    ("england", 10),
    ("italy", 768),
    ("spain", 9),
    ("brazil", 6),
    ("argentina", 26),
    ("portugal", 27),
    ("netherlands", 1114),
    ("belgium", 1),
    ("croatia", 3),
    ("usa", 2384), ("united states", 2384),
];
